use std::collections::HashMap;

use crate::category::ComponentCategory;

/// Allocates `Circular<Singular><N>` slot names, one counter per category.
#[derive(Debug, Default)]
pub(crate) struct CatalogNamer {
  last: HashMap<ComponentCategory, usize>,
}

impl CatalogNamer {
  /// Starts every counter past the highest `Circular<Singular><N>` already in the catalog.
  pub(crate) fn from_existing<'a>(names: impl IntoIterator<Item = (ComponentCategory, &'a str)>) -> Self {
    let mut last = HashMap::new();
    for (category, name) in names {
      let Some(n) = name
        .strip_prefix(category.circular_prefix().as_str())
        .and_then(|suffix| suffix.parse::<usize>().ok())
      else {
        continue;
      };
      let slot = last.entry(category).or_insert(0);
      *slot = (*slot).max(n);
    }
    Self { last }
  }

  pub(crate) fn next_name(&mut self, category: ComponentCategory) -> String {
    let slot = self.last.entry(category).or_insert(0);
    *slot += 1;
    format!("{}{}", category.circular_prefix(), slot)
  }
}
