//! Environment variable access.

/// Value of `name`, treating unset, empty and non-UTF-8 variables alike as
/// absent.
///
/// # Examples
///
/// ```
/// assert_eq!(triconf::env_value("TRICONF_DOC_SURELY_UNSET"), None);
/// ```
#[must_use]
pub fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::env_value;
    use serial_test::serial;

    #[test]
    #[serial]
    fn empty_values_are_absent() {
        let _set = test_helpers::env::set_var("TRICONF_ENV_TEST_EMPTY", "");
        assert_eq!(env_value("TRICONF_ENV_TEST_EMPTY"), None);
    }

    #[test]
    #[serial]
    fn present_values_are_returned_verbatim() {
        let _set = test_helpers::env::set_var("TRICONF_ENV_TEST_VALUE", " padded ");
        assert_eq!(
            env_value("TRICONF_ENV_TEST_VALUE").as_deref(),
            Some(" padded ")
        );
    }
}
