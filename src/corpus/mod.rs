//! Corpus model
//!
//! A corpus is a list of chapters (surahs), each holding its verses in
//! reading order. Chapters are validated into [`Document`]s on load, so the
//! pager can rely on the verse count and dense 1-based verse ids.

use std::io::Read;
use std::path::Path;

use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A single verse (ayah)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verse {
    /// 1-based position within the chapter
    pub id: u32,
    /// Original Arabic text
    pub text: String,
    /// Translated text; empty when only the original is available
    #[serde(default)]
    pub translation: String,
}

impl Verse {
    pub fn new(id: u32, text: impl Into<String>, translation: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            translation: translation.into(),
        }
    }
}

/// Chapter metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    pub id: u32,
    /// Name in Arabic script
    pub name: String,
    pub transliteration: String,
    /// Translated title
    pub translation: String,
    /// Category tag (meccan/medinan)
    #[serde(rename = "type")]
    pub kind: String,
    pub total_verses: usize,
}

/// Chapter record as it appears in the JSON corpus
#[derive(Debug, Clone, Deserialize)]
struct RawChapter {
    #[serde(flatten)]
    chapter: Chapter,
    #[serde(default)]
    verses: Vec<Verse>,
}

/// A validated chapter with its verses, immutable once built
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    chapter: Chapter,
    verses: Vec<Verse>,
}

impl Document {
    /// Build a document, checking the verse count and verse numbering
    pub fn new(chapter: Chapter, verses: Vec<Verse>) -> CorpusResult<Self> {
        if verses.is_empty() {
            return Err(CorpusError::EmptyChapter(chapter.id));
        }

        if chapter.total_verses != verses.len() {
            return Err(CorpusError::VerseCountMismatch {
                chapter: chapter.id,
                declared: chapter.total_verses,
                actual: verses.len(),
            });
        }

        for (position, verse) in verses.iter().enumerate() {
            if verse.id as usize != position + 1 {
                return Err(CorpusError::NonSequentialVerse {
                    chapter: chapter.id,
                    position,
                    id: verse.id,
                });
            }
        }

        Ok(Self { chapter, verses })
    }

    pub fn chapter(&self) -> &Chapter {
        &self.chapter
    }

    pub fn verses(&self) -> &[Verse] {
        &self.verses
    }

    /// Number of verses, always at least one
    pub fn total(&self) -> usize {
        self.verses.len()
    }
}

/// All chapters of a corpus
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    documents: Vec<Document>,
}

impl Corpus {
    /// Parse a JSON corpus from a reader
    pub fn from_reader(reader: impl Read) -> CorpusResult<Self> {
        let raw: Vec<RawChapter> = serde_json::from_reader(reader)?;
        let documents = raw
            .into_iter()
            .map(|r| Document::new(r.chapter, r.verses))
            .collect::<CorpusResult<Vec<_>>>()?;

        tracing::debug!(chapters = documents.len(), "corpus parsed");
        Ok(Self { documents })
    }

    /// Load a JSON corpus from a file
    pub fn load(path: &Path) -> CorpusResult<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Find a chapter by number
    pub fn by_id(&self, id: u32) -> Option<&Document> {
        self.documents.iter().find(|d| d.chapter.id == id)
    }

    /// Find a chapter by its exact transliterated name, ignoring case
    pub fn by_name(&self, name: &str) -> Option<&Document> {
        self.documents
            .iter()
            .find(|d| d.chapter.transliteration.eq_ignore_ascii_case(name))
    }

    /// Find the first chapter whose transliterated name contains `name`,
    /// ignoring case
    pub fn by_name_like(&self, name: &str) -> Option<&Document> {
        let needle = name.to_lowercase();
        self.documents
            .iter()
            .find(|d| d.chapter.transliteration.to_lowercase().contains(&needle))
    }

    /// Pick a chapter uniformly at random, `None` for an empty corpus
    pub fn random<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Document> {
        self.documents.choose(rng)
    }
}

/// Error type for corpus loading
#[derive(Debug, thiserror::Error)]
pub enum CorpusError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("surah #{0} has no verses")]
    EmptyChapter(u32),

    #[error("surah #{chapter} declares {declared} verses but has {actual}")]
    VerseCountMismatch {
        chapter: u32,
        declared: usize,
        actual: usize,
    },

    #[error("surah #{chapter}: verse at position {position} has id {id}")]
    NonSequentialVerse { chapter: u32, position: usize, id: u32 },

    #[error("surah {0} not found")]
    NotFound(String),
}

/// Result type for corpus operations
pub type CorpusResult<T> = Result<T, CorpusError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn chapter(id: u32, transliteration: &str, total_verses: usize) -> Chapter {
        Chapter {
            id,
            name: "الفاتحة".to_string(),
            transliteration: transliteration.to_string(),
            translation: "The Opener".to_string(),
            kind: "meccan".to_string(),
            total_verses,
        }
    }

    const SAMPLE: &str = r#"[
        {
            "id": 1,
            "name": "الفاتحة",
            "transliteration": "Al-Fatihah",
            "translation": "The Opener",
            "type": "meccan",
            "total_verses": 2,
            "verses": [
                {"id": 1, "text": "بِسْمِ ٱللَّهِ", "translation": "In the name of Allah"},
                {"id": 2, "text": "ٱلْحَمْدُ لِلَّهِ"}
            ]
        },
        {
            "id": 112,
            "name": "الإخلاص",
            "transliteration": "Al-Ikhlas",
            "translation": "The Sincerity",
            "type": "meccan",
            "total_verses": 1,
            "verses": [{"id": 1, "text": "قُلْ هُوَ ٱللَّهُ أَحَدٌ", "translation": "Say, He is Allah, One"}]
        }
    ]"#;

    #[test]
    fn test_document_valid() {
        let doc = Document::new(
            chapter(1, "Al-Fatihah", 2),
            vec![Verse::new(1, "a", "A"), Verse::new(2, "b", "")],
        )
        .unwrap();
        assert_eq!(doc.total(), 2);
        assert_eq!(doc.verses()[1].id, 2);
        assert_eq!(doc.chapter().transliteration, "Al-Fatihah");
    }

    #[test]
    fn test_document_count_mismatch() {
        let err = Document::new(chapter(1, "x", 3), vec![Verse::new(1, "a", "")]).unwrap_err();
        assert!(matches!(
            err,
            CorpusError::VerseCountMismatch {
                declared: 3,
                actual: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_document_non_sequential() {
        let err = Document::new(
            chapter(1, "x", 2),
            vec![Verse::new(1, "a", ""), Verse::new(3, "b", "")],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CorpusError::NonSequentialVerse {
                position: 1,
                id: 3,
                ..
            }
        ));
    }

    #[test]
    fn test_document_empty() {
        let err = Document::new(chapter(9, "x", 0), Vec::new()).unwrap_err();
        assert!(matches!(err, CorpusError::EmptyChapter(9)));
    }

    #[test]
    fn test_corpus_from_reader() {
        let corpus = Corpus::from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(corpus.documents().len(), 2);

        let fatihah = corpus.by_id(1).unwrap();
        assert_eq!(fatihah.chapter().kind, "meccan");
        assert_eq!(fatihah.verses()[1].translation, "");
        assert!(corpus.by_id(2).is_none());
    }

    #[test]
    fn test_corpus_lookup_by_name() {
        let corpus = Corpus::from_reader(SAMPLE.as_bytes()).unwrap();

        assert_eq!(corpus.by_name("al-ikhlas").unwrap().chapter().id, 112);
        assert!(corpus.by_name("ikhlas").is_none());
        assert_eq!(corpus.by_name_like("IKHLAS").unwrap().chapter().id, 112);
        assert_eq!(corpus.by_name_like("al-").unwrap().chapter().id, 1);
        assert!(corpus.by_name_like("baqarah").is_none());
    }

    #[test]
    fn test_corpus_random() {
        use rand::rngs::StdRng;
        use rand::SeedableRng;

        let corpus = Corpus::from_reader(SAMPLE.as_bytes()).unwrap();
        let mut rng = StdRng::seed_from_u64(42);

        let ids: std::collections::BTreeSet<u32> = (0..64)
            .map(|_| corpus.random(&mut rng).unwrap().chapter().id)
            .collect();
        assert_eq!(ids.into_iter().collect::<Vec<_>>(), vec![1, 112]);

        let empty = Corpus::from_reader("[]".as_bytes()).unwrap();
        assert!(empty.random(&mut rng).is_none());
    }

    #[test]
    fn test_corpus_rejects_invalid_chapter() {
        let json = r#"[{"id": 5, "name": "", "transliteration": "", "translation": "",
            "type": "", "total_verses": 4, "verses": [{"id": 1, "text": "x"}]}]"#;
        assert!(matches!(
            Corpus::from_reader(json.as_bytes()),
            Err(CorpusError::VerseCountMismatch { chapter: 5, .. })
        ));
    }

    #[test]
    fn test_corpus_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quran_en.json");
        std::fs::write(&path, SAMPLE).unwrap();

        let corpus = Corpus::load(&path).unwrap();
        assert_eq!(corpus.documents().len(), 2);

        assert!(matches!(
            Corpus::load(&dir.path().join("missing.json")),
            Err(CorpusError::Io(_))
        ));
    }
}
