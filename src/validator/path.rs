//! Walk paths for error reporting

use std::fmt;

use crate::schema::NodeKey;

/// Keys and indices from the input root to the current position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkPath(Vec<NodeKey>);

impl WalkPath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn segments(&self) -> &[NodeKey] {
        &self.0
    }

    pub(crate) fn push_key(&mut self, key: &str) {
        self.0.push(NodeKey::Field(key.to_string()));
    }

    pub(crate) fn push_index(&mut self, index: usize) {
        self.0.push(NodeKey::Index(index));
    }

    pub(crate) fn pop(&mut self) {
        self.0.pop();
    }
}

impl From<Vec<NodeKey>> for WalkPath {
    fn from(segments: Vec<NodeKey>) -> Self {
        Self(segments)
    }
}

/// Renders as `a.b[1].c`; the root renders as `$`.
impl fmt::Display for WalkPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("$");
        }
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                NodeKey::Field(key) if i == 0 => write!(f, "{}", key)?,
                NodeKey::Field(key) => write!(f, ".{}", key)?,
                NodeKey::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_display() {
        assert_eq!(WalkPath::root().to_string(), "$");
    }

    #[test]
    fn test_mixed_display() {
        let mut path = WalkPath::root();
        path.push_key("data");
        path.push_key("tags");
        path.push_index(1);
        path.push_key("name");
        assert_eq!(path.to_string(), "data.tags[1].name");
        path.pop();
        assert_eq!(path.to_string(), "data.tags[1]");
    }

    #[test]
    fn test_leading_index() {
        let mut path = WalkPath::root();
        path.push_index(3);
        assert_eq!(path.to_string(), "[3]");
    }
}
