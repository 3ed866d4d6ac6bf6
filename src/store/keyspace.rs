use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use crate::common::{Error, Result};

/// Id types that can be written into and read back from a key.
pub trait StoreId: Sized {
    fn to_key_part(&self) -> String;
    fn from_key_part(part: &str) -> Result<Self>;
}

impl<T> StoreId for T
where
    T: fmt::Display + FromStr,
    T::Err: fmt::Display,
{
    fn to_key_part(&self) -> String {
        self.to_string()
    }

    fn from_key_part(part: &str) -> Result<Self> {
        part.parse()
            .map_err(|e| Error::invalid_format(format!("bad id {:?}. {}", part, e)))
    }
}

/// Keys sharing one prefix.
///
/// Every key matching the prefix is taken to belong to the space. When
/// another store uses a longer prefix starting with this one (`user:` and
/// `user:roles:`), its keys are listed too and fail to parse as ids, so
/// listing operations such as `ids` return an error. Pick prefixes that do
/// not overlap.
pub struct KeySpace<Id> {
    prefix: String,
    _id: PhantomData<fn() -> Id>,
}

impl<Id> Clone for KeySpace<Id> {
    fn clone(&self) -> Self {
        Self::new(self.prefix.clone())
    }
}

impl<Id> fmt::Debug for KeySpace<Id> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("KeySpace")
            .field("prefix", &self.prefix)
            .finish()
    }
}

impl<Id> KeySpace<Id> {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            _id: PhantomData,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Glob matching every key of this space.
    pub fn pattern(&self) -> String {
        let mut pattern = String::with_capacity(self.prefix.len() + 1);
        for c in self.prefix.chars() {
            if matches!(c, '*' | '?' | '[' | ']' | '\\') {
                pattern.push('\\');
            }
            pattern.push(c);
        }
        pattern.push('*');
        pattern
    }
}

impl<Id: StoreId> KeySpace<Id> {
    pub fn id_to_key(&self, id: &Id) -> String {
        format!("{}{}", self.prefix, id.to_key_part())
    }

    pub fn ids_to_keys(&self, ids: &[Id]) -> Vec<String> {
        ids.iter().map(|id| self.id_to_key(id)).collect()
    }

    pub fn key_to_id(&self, key: &str) -> Result<Id> {
        let part = key.strip_prefix(self.prefix.as_str()).ok_or_else(|| {
            Error::invalid_format(format!("key {:?} is outside {:?}", key, self.prefix))
        })?;
        Id::from_key_part(part)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translate() {
        let space = KeySpace::<u64>::new("user:");

        assert_eq!(space.id_to_key(&42), "user:42");
        assert_eq!(space.key_to_id("user:42").unwrap(), 42);
        assert!(space.key_to_id("user:abc").unwrap_err().is_invalid_format());
        assert!(space.key_to_id("order:42").unwrap_err().is_invalid_format());
    }

    #[test]
    fn pattern_escapes_glob() {
        assert_eq!(KeySpace::<String>::new("user:").pattern(), "user:*");
        assert_eq!(KeySpace::<String>::new("a*b?").pattern(), r"a\*b\?*");
        assert_eq!(KeySpace::<String>::new("").pattern(), "*");
    }
}
