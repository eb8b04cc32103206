/// Verification checks and the pipeline that orders them.
pub mod validation;
