//! Redacting wrapper for secrets
//!
//! The ingestion bearer token is carried in `Sensitive<String>` so that
//! `Debug`-printing a config or logging it never leaks the value.

use std::fmt;

/// Wrapper that prints `***REDACTED***` in Debug and Display
///
/// # Example
///
/// ```
/// use bookdelta_core_types::Sensitive;
///
/// let token = Sensitive::new("tok_live_123".to_string());
/// assert_eq!(format!("{:?}", token), "***REDACTED***");
/// assert_eq!(token.expose(), "tok_live_123");
/// ```
pub struct Sensitive<T>(T);

impl<T> Sensitive<T> {
    pub fn new(value: T) -> Self {
        Self(value)
    }

    /// Borrow the secret. Only call this at the point of use (e.g. when
    /// building an `Authorization` header).
    pub fn expose(&self) -> &T {
        &self.0
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> From<T> for Sensitive<T> {
    fn from(value: T) -> Self {
        Self(value)
    }
}

impl<T> fmt::Debug for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***REDACTED***")
    }
}

impl<T> fmt::Display for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***REDACTED***")
    }
}

impl<T: Clone> Clone for Sensitive<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_and_display_are_redacted() {
        let token = Sensitive::new("secret-token".to_string());
        assert_eq!(format!("{:?}", token), "***REDACTED***");
        assert_eq!(format!("{}", token), "***REDACTED***");
    }

    #[test]
    fn test_redacted_inside_containing_struct() {
        #[derive(Debug)]
        #[allow(dead_code)]
        struct Endpoint {
            url: String,
            token: Option<Sensitive<String>>,
        }

        let endpoint = Endpoint {
            url: "http://localhost:8000/insert_batch".to_string(),
            token: Some(Sensitive::from("abc123".to_string())),
        };
        let rendered = format!("{:?}", endpoint);
        assert!(rendered.contains("insert_batch"));
        assert!(!rendered.contains("abc123"));
    }

    #[test]
    fn test_expose_and_into_inner() {
        let token = Sensitive::new(String::from("t"));
        assert_eq!(token.expose(), "t");
        assert_eq!(token.clone().into_inner(), "t");
    }
}
