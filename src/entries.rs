//! The fixed component set of the extension and its entry resolution.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::project::PackLayout;

/// Logical unit of the extension, declared once at configuration time.
///
/// The set is closed: a browser extension built by this crate always consists of
/// exactly these three surfaces, and the router's lookup table is an exhaustive
/// match over them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Component {
  /// The popup UI opened from the toolbar button.
  Popup,
  /// The content script injected into visited pages.
  Content,
  /// The background service worker.
  Background,
}

impl Component {
  /// All declared components, in routing-table order.
  pub const ALL: [Component; 3] = [Component::Popup, Component::Content, Component::Background];

  /// Stable lower-case name used in artifact descriptors and output paths.
  pub fn name(self) -> &'static str {
    match self {
      Component::Popup => "popup",
      Component::Content => "content",
      Component::Background => "background",
    }
  }

  /// Parse a component name, returning `None` for anything outside the fixed set.
  pub fn from_name(name: &str) -> Option<Self> {
    match name {
      "popup" => Some(Component::Popup),
      "content" => Some(Component::Content),
      "background" => Some(Component::Background),
      _ => None,
    }
  }

  /// Fixed destination of this component's entry script inside the output tree.
  ///
  /// The extension runtime loads each script from a predictable path; the content
  /// and background scripts keep their `index.js` source filename while the popup
  /// script carries the component name.
  pub fn script_destination(self) -> &'static str {
    match self {
      Component::Popup => "src/popup/popup.js",
      Component::Content => "src/content/index.js",
      Component::Background => "src/background/index.js",
    }
  }

  /// Source entry path declared in the layout for this component.
  pub fn entry_source(self, layout: &PackLayout) -> PathBuf {
    match self {
      Component::Popup => PathBuf::from(&layout.popup_entry),
      Component::Content => PathBuf::from(&layout.content_entry),
      Component::Background => PathBuf::from(&layout.background_entry),
    }
  }
}

/// Map every declared component to its entry source path.
///
/// Purely declarative with no failure modes; this mapping is the single source of
/// truth consumed by the router and handed to the external build engine so it knows
/// what to compile.
pub fn resolve_entries(layout: &PackLayout) -> BTreeMap<Component, PathBuf> {
  Component::ALL
    .iter()
    .map(|component| (*component, component.entry_source(layout)))
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::ProjectConfig;

  #[test]
  fn resolves_all_three_components() {
    let layout = ProjectConfig::default().into_layout();
    let entries = resolve_entries(&layout);

    assert_eq!(entries.len(), 3);
    assert_eq!(
      entries[&Component::Popup],
      PathBuf::from("src/popup/popup.ts")
    );
    assert_eq!(
      entries[&Component::Content],
      PathBuf::from("src/content/index.ts")
    );
    assert_eq!(
      entries[&Component::Background],
      PathBuf::from("src/background/index.ts")
    );
  }

  #[test]
  fn component_names_round_trip() {
    for component in Component::ALL {
      assert_eq!(Component::from_name(component.name()), Some(component));
    }
    assert_eq!(Component::from_name("options"), None);
  }

  #[test]
  fn script_destinations_are_runtime_predictable() {
    assert_eq!(Component::Popup.script_destination(), "src/popup/popup.js");
    assert_eq!(Component::Content.script_destination(), "src/content/index.js");
    assert_eq!(
      Component::Background.script_destination(),
      "src/background/index.js"
    );
  }
}
