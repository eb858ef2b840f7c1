//! Schema file name allocation
//!
//! Class names are sanitized into file stems. Two classes of one folder that
//! sanitize to the same stem (`A/B` and `A B`) get numeric suffixes in
//! processing order: `a_b`, `a_b_2`, `a_b_3`, ...

use std::collections::HashSet;

use crate::validation::input::{MAX_SANITIZED_NAME_LENGTH, sanitize_class_name};

/// Outcome of allocating a stem for one class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocation {
    /// Stem the class sanitizes to
    pub base: String,
    /// Stem actually assigned
    pub stem: String,
}

impl Allocation {
    pub fn collided(&self) -> bool {
        self.base != self.stem
    }

    pub fn file_name(&self) -> String {
        format!("{}.json", self.stem)
    }
}

/// Hands out unique file stems within one version folder.
#[derive(Debug, Default)]
pub struct NameAllocator {
    used: HashSet<String>,
    reserved: HashSet<String>,
}

impl NameAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocator that never hands out the given stems
    pub fn with_reserved<I, S>(stems: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            used: HashSet::new(),
            reserved: stems.into_iter().map(Into::into).collect(),
        }
    }

    fn is_taken(&self, stem: &str) -> bool {
        self.used.contains(stem) || self.reserved.contains(stem)
    }

    /// Allocate a stem for a class name.
    ///
    /// # Example
    ///
    /// ```rust
    /// use xmi_schema::convert::naming::NameAllocator;
    ///
    /// let mut names = NameAllocator::with_reserved(["openapi"]);
    /// assert_eq!(names.allocate("A/B").stem, "a_b");
    /// assert_eq!(names.allocate("A B").stem, "a_b_2");
    /// assert_eq!(names.allocate("OpenAPI").stem, "openapi_2");
    /// ```
    pub fn allocate(&mut self, class_name: &str) -> Allocation {
        let base = sanitize_class_name(class_name);
        let mut stem = base.clone();
        let mut n: u64 = 2;
        while self.is_taken(&stem) {
            stem = suffixed(&base, n);
            n += 1;
        }
        self.used.insert(stem.clone());
        Allocation { base, stem }
    }
}

/// `<base>_<n>`, with `base` shortened so the result stays within the
/// sanitized name length limit.
fn suffixed(base: &str, n: u64) -> String {
    let suffix = format!("_{}", n);
    let keep = MAX_SANITIZED_NAME_LENGTH.saturating_sub(suffix.len());
    let head = if base.len() > keep {
        base[..keep].trim_end_matches('_')
    } else {
        base
    };
    format!("{}{}", head, suffix)
}
