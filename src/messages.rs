//! The fixed strings shown to the user.

use serde::Deserialize;
use serde::Serialize;

/// A language the built-in [`Messages`] are available in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[allow(missing_docs)]
pub enum Language {
  English,
  Spanish,
}

impl Default for Language {
  fn default() -> Self {
    Language::English
  }
}

/// Everything the orchestrator may write into a region, other than the
/// service's own answer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Messages {
  /// Shown in the breakdown region when the sentence is blank.
  pub prompt: String,
  /// Text shown in the breakdown region while a request is outstanding.
  pub generating_analysis: String,
  /// Markup shown in the tree region while a request is outstanding.
  pub generating_tree: String,
  /// Text shown in the breakdown region when a request fails.
  pub analysis_error: String,
  /// Text shown in the tree region when a request fails.
  pub tree_error: String,
}

impl Messages {
  /// The built-in message set for `lang`.
  pub fn for_language(lang: Language) -> Self {
    match lang {
      Language::English => Self::english(),
      Language::Spanish => Self::spanish(),
    }
  }

  /// English messages.
  pub fn english() -> Self {
    Self {
      prompt: "Please enter a sentence.".into(),
      generating_analysis: "Generating analysis...".into(),
      generating_tree: "<p>Generating tree...</p>".into(),
      analysis_error: "Error: Could not generate the analysis.".into(),
      tree_error: "Error: Could not generate the tree.".into(),
    }
  }

  /// Spanish messages, as served by the analysis service's own page.
  pub fn spanish() -> Self {
    Self {
      prompt: "Por favor, introduce una oración.".into(),
      generating_analysis: "Generando análisis...".into(),
      generating_tree: "<p>Generando árbol...</p>".into(),
      analysis_error: "Error: No se pudo generar el análisis.".into(),
      tree_error: "Error: No se pudo generar el árbol.".into(),
    }
  }
}

impl Default for Messages {
  fn default() -> Self {
    Self::english()
  }
}
