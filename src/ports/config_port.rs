//! Configuration access port trait.
//!
//! Numeric keys are read as strings and parsed by the validators, so an
//! unparsable value is reported rather than replaced by a default.

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool;
}
