//! Maximum character widths of the bounded text columns.
//!
//! The migrations encode the same numbers as `CHECK (length(col) <= n)`
//! constraints; these constants let handlers reject oversize input before
//! it reaches the store.

pub const USER_NAME: usize = 100;
pub const USER_EMAIL: usize = 100;
/// Width of the stored hash, not of the plaintext.
pub const USER_PASSWORD_HASH: usize = 100;

pub const PERSONAL_NAME: usize = 20;
pub const PERSONAL_PHONE: usize = 11;
pub const PERSONAL_RESUME: usize = 255;

pub const COMPANY_NAME: usize = 100;
pub const COMPANY_ADDRESS: usize = 100;
pub const COMPANY_PHONE: usize = 11;
pub const COMPANY_LOGO: usize = 255;
pub const COMPANY_FIELD: usize = 64;
pub const COMPANY_FINANCING: usize = 64;

pub const JOB_NAME: usize = 100;
pub const JOB_ADDRESS: usize = 100;
pub const JOB_LABEL: usize = 255;
pub const JOB_JOBYEAR: usize = 20;
pub const JOB_EDUCATION: usize = 20;
