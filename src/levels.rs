//! Level pack loading
//!
//! Templates are parsed and validated once, up front. A pack that fails
//! validation is refused as a whole.

use std::ops::Index;

use crate::sim::{LevelError, LevelTemplate};

/// The shipped levels
const BUILTIN_LEVELS: &str = include_str!("../assets/levels.json");

/// Ordered, validated, immutable level templates
#[derive(Debug, Clone)]
pub struct LevelSet {
    templates: Vec<LevelTemplate>,
}

impl LevelSet {
    /// Parse a JSON array of templates and validate each one
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let templates: Vec<LevelTemplate> = serde_json::from_str(json)?;
        Self::new(templates)
    }

    pub fn new(templates: Vec<LevelTemplate>) -> Result<Self, LevelError> {
        if templates.is_empty() {
            return Err(LevelError::EmptyLevelSet);
        }
        for template in &templates {
            template.validate()?;
        }
        log::debug!("Validated {} level templates", templates.len());
        Ok(Self { templates })
    }

    /// The levels embedded in the binary
    pub fn builtin() -> Result<Self, LevelError> {
        Self::from_json(BUILTIN_LEVELS)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Never true for a constructed set; kept for the `len` convention
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&LevelTemplate> {
        self.templates.get(index)
    }

    pub fn is_last(&self, index: usize) -> bool {
        index + 1 >= self.templates.len()
    }
}

impl Index<usize> for LevelSet {
    type Output = LevelTemplate;

    fn index(&self, index: usize) -> &LevelTemplate {
        &self.templates[index]
    }
}
