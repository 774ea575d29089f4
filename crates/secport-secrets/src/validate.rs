//! Semantic checks on a constructed [`Secret`]. Import only checks shapes;
//! this checks that ids and tags actually parse.

use secport_core::{FormatError, SecretId, Tag};

use crate::error::{FieldRole, ValidationError};
use crate::secret::Secret;

impl Secret {
    /// Check the id, owner, ACL subjects and consumer tags.
    ///
    /// Checks run in that order and the first failure is returned. An empty
    /// owner or consumer means "unset" and passes.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id().is_empty() {
            return Err(ValidationError::MissingId);
        }
        SecretId::parse(self.id()).map_err(|source| ValidationError::InvalidId {
            id: self.id().to_string(),
            source,
        })?;

        self.owner().map_err(|e| self.invalid_tag(FieldRole::Owner, e))?;

        for subject in self.acl().keys() {
            Tag::parse(subject)
                .map_err(|e| self.invalid_tag(FieldRole::AccessSubject, e))?;
        }

        for consumer in self.consumers() {
            consumer
                .consumer()
                .map_err(|e| self.invalid_tag(FieldRole::Consumer, e))?;
        }
        Ok(())
    }

    fn invalid_tag(&self, role: FieldRole, source: FormatError) -> ValidationError {
        ValidationError::InvalidTag {
            id: self.id().to_string(),
            role,
            source,
        }
    }
}
