//! Failure policy for listing helpers.

use tracing::warn;

use crate::db::RepositoryError;

/// What a listing helper does when the store fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnError {
    /// Propagate the error to the caller.
    Fail,
    /// Log a warning and return an empty list.
    Degrade,
}

impl OnError {
    /// Apply the policy to a listing result.
    ///
    /// `resource` names the listing in the warning.
    ///
    /// # Errors
    ///
    /// Returns the store error unchanged under [`OnError::Fail`].
    pub fn apply<T>(
        self,
        resource: &'static str,
        result: Result<Vec<T>, RepositoryError>,
    ) -> Result<Vec<T>, RepositoryError> {
        match (self, result) {
            (_, Ok(rows)) => Ok(rows),
            (Self::Fail, Err(e)) => Err(e),
            (Self::Degrade, Err(e)) => {
                warn!(resource, error = %e, "Listing unavailable, returning no rows");
                Ok(Vec::new())
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_fail_propagates() {
        let result: Result<Vec<u8>, _> =
            OnError::Fail.apply("things", Err(RepositoryError::NotFound));
        assert!(matches!(result, Err(RepositoryError::NotFound)));
    }

    #[test]
    fn test_degrade_returns_empty() {
        let result: Result<Vec<u8>, _> = OnError::Degrade.apply(
            "things",
            Err(RepositoryError::Unavailable("down".to_owned())),
        );
        assert!(result.unwrap().is_empty());
    }

    #[test]
    fn test_rows_pass_through_either_way() {
        assert_eq!(OnError::Fail.apply("things", Ok(vec![1])).unwrap(), vec![1]);
        assert_eq!(OnError::Degrade.apply("things", Ok(vec![2])).unwrap(), vec![2]);
    }
}
