use crate::Scope;

#[must_use]
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("root route must specify a default receiver")]
    RootReceiverMissing,
    #[error("repeat interval must be positive")]
    RepeatIntervalNotPositive,
    #[error("{entity} {name:?} does not exist")]
    NoSuchEntity { entity: &'static str, name: String },
    #[error("{entity} {name:?} does not exist; did you mean {suggest_name:?}?")]
    NoSuchEntitySuggest {
        entity: &'static str,
        name: String,
        suggest_name: String,
    },
}

impl Error {
    pub fn push(self, scope: Scope, errors: &mut Errors) {
        errors.0.push(ScopedError {
            scope: scope.flatten(),
            error: self,
        });
    }
}

/// ScopedError is an Error and the location of the policy tree at which it occurred,
/// as a URL fragment-encoded JSON pointer (for example `#/routes/0/receiver`).
#[derive(Debug, Clone, PartialEq)]
pub struct ScopedError {
    pub scope: String,
    pub error: Error,
}

impl std::fmt::Display for ScopedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.scope, self.error)
    }
}

/// Errors of a validation, in the pre-order of the policy tree walk.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Errors(Vec<ScopedError>);

impl Errors {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn iter(&self) -> std::slice::Iter<'_, ScopedError> {
        self.0.iter()
    }
    pub fn into_result(self) -> Result<(), Errors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl std::fmt::Display for Errors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (index, err) in self.0.iter().enumerate() {
            if index != 0 {
                f.write_str("\n")?;
            }
            err.fmt(f)?;
        }
        Ok(())
    }
}

impl std::error::Error for Errors {}

impl<'a> IntoIterator for &'a Errors {
    type Item = &'a ScopedError;
    type IntoIter = std::slice::Iter<'a, ScopedError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
