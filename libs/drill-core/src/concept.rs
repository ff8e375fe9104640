//! Cross-language concept equivalence for picture prompts.
//!
//! The dictionary maps a concept key to surface forms in any number of
//! languages. It is indexed once at load time by `(ruleset, normalized form)`
//! so matching costs one hash lookup per ruleset instead of a scan.

use crate::error::{DrillError, Result};
use crate::normalize::{normalize, normalize_lenient, Strictness};
use crate::resolver::resolve_tag;
use crate::script::Script;
use crate::types::Word;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::io::Read;
use std::path::Path;

/// One concept as written in a dictionary file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConceptEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Language tag to surface forms.
    pub forms: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct DictionaryFile {
    concepts: BTreeMap<String, ConceptEntry>,
}

/// A surface form with its precomputed normalizations.
#[derive(Debug, Clone)]
pub struct SurfaceForm {
    pub language: String,
    pub script: Script,
    pub text: String,
    primary: String,
}

#[derive(Debug, Clone)]
pub struct Concept {
    pub key: String,
    pub category: Option<String>,
    pub forms: Vec<SurfaceForm>,
}

impl Concept {
    fn fits_category(&self, category: Option<&str>) -> bool {
        match (self.category.as_deref(), category) {
            (Some(own), Some(wanted)) => own.trim().eq_ignore_ascii_case(wanted.trim()),
            _ => true,
        }
    }

    fn scripts(&self) -> impl Iterator<Item = Script> + '_ {
        self.forms.iter().map(|f| f.script)
    }
}

type IndexKey = (Script, String);

/// Read-only concept dictionary, shared freely across sessions.
#[derive(Debug, Clone, Default)]
pub struct ConceptDictionary {
    concepts: Vec<Concept>,
    by_key: HashMap<String, usize>,
    primary: HashMap<IndexKey, Vec<usize>>,
    special: HashMap<IndexKey, Vec<usize>>,
}

impl ConceptDictionary {
    /// Build and index a dictionary.
    pub fn new<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, ConceptEntry)>,
    {
        let mut dictionary = Self::default();
        for (key, entry) in entries {
            dictionary.insert(key, entry)?;
        }
        tracing::debug!(
            concepts = dictionary.concepts.len(),
            indexed_forms = dictionary.primary.len(),
            "concept dictionary indexed"
        );
        Ok(dictionary)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let file: DictionaryFile = serde_json::from_str(json)?;
        Self::new(file.concepts)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let file: DictionaryFile = serde_json::from_reader(reader)?;
        Self::new(file.concepts)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    fn insert(&mut self, key: String, entry: ConceptEntry) -> Result<()> {
        let key = key.trim().to_string();
        if key.is_empty() {
            return Err(DrillError::Dictionary("concept key must not be blank".to_string()));
        }
        if self.by_key.contains_key(&key) {
            return Err(DrillError::Dictionary(format!("duplicate concept key {key}")));
        }

        let id = self.concepts.len();
        let mut forms = Vec::new();
        for (language, texts) in entry.forms {
            for text in texts {
                let script = resolve_tag(&language, &text);
                let primary = normalize(&text, script);
                if primary.is_empty() {
                    continue;
                }
                Self::index(&mut self.primary, (script, primary.clone()), id);
                if script.is_high_variance() {
                    let lenient = normalize_lenient(&text, script);
                    if !lenient.is_empty() {
                        Self::index(&mut self.special, (script, lenient), id);
                    }
                }
                forms.push(SurfaceForm {
                    language: language.clone(),
                    script,
                    text,
                    primary,
                });
            }
        }

        self.by_key.insert(key.clone(), id);
        self.concepts.push(Concept {
            key,
            category: entry.category,
            forms,
        });
        Ok(())
    }

    fn index(index: &mut HashMap<IndexKey, Vec<usize>>, key: IndexKey, id: usize) {
        let ids = index.entry(key).or_default();
        if !ids.contains(&id) {
            ids.push(id);
        }
    }

    pub fn len(&self) -> usize {
        self.concepts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Concept> {
        self.by_key.get(key).map(|&id| &self.concepts[id])
    }

    fn lookup(&self, script: Script, normalized: String, strictness: Strictness) -> &[usize] {
        let index = match strictness {
            Strictness::Primary => &self.primary,
            Strictness::Special => &self.special,
        };
        index
            .get(&(script, normalized))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Concepts a prompt stands for.
    ///
    /// A category naming a concept key selects that concept outright.
    /// Otherwise the word's own text is looked up and filtered by category,
    /// first under `script` and then under the script its characters belong
    /// to, since a prompt without a language inherits the session's.
    pub fn concepts_for(&self, word: &Word, script: Script) -> Vec<usize> {
        let category = word.category.as_deref().map(str::trim);
        if let Some(&id) = category.and_then(|c| self.by_key.get(c)) {
            return vec![id];
        }

        for candidate in prompt_scripts(&word.text, script) {
            let text = normalize(&word.text, candidate);
            if text.is_empty() {
                continue;
            }
            let ids: Vec<usize> = self
                .lookup(candidate, text, Strictness::Primary)
                .iter()
                .copied()
                .filter(|&id| self.concepts[id].fits_category(category))
                .collect();
            if !ids.is_empty() {
                return ids;
            }
        }
        Vec::new()
    }
}

/// Scripts to try for a prompt's text, `resolved` first.
fn prompt_scripts(text: &str, resolved: Script) -> Vec<Script> {
    let detected = Script::detect(text);
    let mut scripts = vec![resolved];
    if let Some(detected) = detected {
        if detected != resolved {
            scripts.push(detected);
        }
    }
    // Text with no script-specific characters can be either Latin ruleset
    if matches!(detected, None | Some(Script::LatinAccented)) {
        for latin in [Script::Latin, Script::LatinAccented] {
            if !scripts.contains(&latin) {
                scripts.push(latin);
            }
        }
    }
    scripts
}

/// Which pass of the matcher accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConceptPass {
    Direct,
    Dictionary,
    Lenient,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConceptMatch {
    pub pass: ConceptPass,
    pub concept: Option<String>,
    pub language: Option<String>,
    pub script: Script,
}

/// Whether `input` is any known rendering of the concept behind `word`.
pub fn matches(input: &str, word: &Word, script: Script, dictionary: &ConceptDictionary) -> bool {
    find_match(input, word, script, dictionary).is_some()
}

/// Run the matcher passes in order and report the first that accepts.
///
/// Gaps in the dictionary only ever cause rejections.
pub fn find_match(
    input: &str,
    word: &Word,
    script: Script,
    dictionary: &ConceptDictionary,
) -> Option<ConceptMatch> {
    let typed = normalize(input, script);
    if typed.is_empty() {
        return None;
    }
    if typed == normalize(&word.text, script) {
        return Some(ConceptMatch {
            pass: ConceptPass::Direct,
            concept: None,
            language: word.language.clone(),
            script,
        });
    }

    let candidates = dictionary.concepts_for(word, script);
    if candidates.is_empty() {
        return None;
    }
    let scripts: BTreeSet<Script> = candidates
        .iter()
        .flat_map(|&id| dictionary.concepts[id].scripts())
        .collect();

    let passes = [
        (Strictness::Primary, ConceptPass::Dictionary),
        (Strictness::Special, ConceptPass::Lenient),
    ];
    for (strictness, pass) in passes {
        for &form_script in &scripts {
            if strictness == Strictness::Special && !form_script.is_high_variance() {
                continue;
            }
            let key = match strictness {
                Strictness::Primary => normalize(input, form_script),
                Strictness::Special => normalize_lenient(input, form_script),
            };
            if key.is_empty() {
                continue;
            }
            let hit = dictionary
                .lookup(form_script, key.clone(), strictness)
                .iter()
                .find(|id| candidates.contains(id));
            if let Some(&id) = hit {
                let concept = &dictionary.concepts[id];
                let language = concept
                    .forms
                    .iter()
                    .find(|f| {
                        f.script == form_script
                            && match strictness {
                                Strictness::Primary => f.primary == key,
                                Strictness::Special => normalize_lenient(&f.text, f.script) == key,
                            }
                    })
                    .map(|f| f.language.clone());
                tracing::debug!(concept = %concept.key, script = %form_script, ?pass, "concept matched");
                return Some(ConceptMatch {
                    pass,
                    concept: Some(concept.key.clone()),
                    language,
                    script: form_script,
                });
            }
        }
    }
    None
}
