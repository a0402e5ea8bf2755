use std::{
    collections::BTreeMap,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use chrono::Utc;
use lazy_static::lazy_static;
use log::{debug, info};
use regex::Regex;
use rusqlite::{params, Connection};
use serde_json::json;
use sha1::{Digest, Sha1};
use zip::{write::SimpleFileOptions, CompressionMethod, ZipWriter};

use super::{
    schema::{
        collection_conf, collection_dconf, collection_decks, APKG_SCHEMA, COLLECTION_CREATED,
        SCHEMA_VERSION,
    },
    Deck,
};
use crate::error::Result;

lazy_static! {
    static ref MEDIA_TAG: Regex =
        Regex::new(r#"(?i)<img[^>]*\ssrc=["']?([^"'>]+)["']?[^>]*>"#).unwrap();
    static ref HTML_TAG: Regex = Regex::new(r"(?s)<.*?>").unwrap();
}

/// An `.apkg` archive: the collection database plus numbered media entries.
pub struct Package<'a> {
    deck: &'a Deck,
    media: Vec<PathBuf>,
}

impl<'a> Package<'a> {
    pub fn new(deck: &'a Deck, media: Vec<PathBuf>) -> Self {
        Self { deck, media }
    }

    pub fn write_to_file(&self, out: &Path) -> Result<()> {
        let scratch = tempfile::tempdir()?;
        let collection = scratch.path().join("collection.anki2");
        self.write_collection(&collection)?;

        let mut zip = ZipWriter::new(File::create(out)?);
        zip.start_file("collection.anki2", entry_options())?;
        zip.write_all(&fs::read(&collection)?)?;

        let mut names = BTreeMap::new();
        for (i, path) in self.media.iter().enumerate() {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.to_string_lossy().into_owned());
            zip.start_file(i.to_string(), entry_options())?;
            zip.write_all(&fs::read(path)?)?;
            names.insert(i.to_string(), name);
        }
        zip.start_file("media", entry_options())?;
        zip.write_all(serde_json::to_string(&names)?.as_bytes())?;
        zip.finish()?;

        info!(
            "Wrote {} notes and {} media files to {}",
            self.deck.cards().len(),
            self.media.len(),
            out.display()
        );
        Ok(())
    }

    fn write_collection(&self, path: &Path) -> Result<()> {
        let deck = self.deck;
        let model = deck.model();
        let now = Utc::now();
        let (secs, millis) = (now.timestamp(), now.timestamp_millis());

        let model_json = model.to_json(deck.id(), secs)?;
        let models = json!({ model.id.to_string(): model_json });
        let decks = collection_decks(deck.id(), deck.title(), secs);

        let mut conn = Connection::open(path)?;
        conn.execute_batch(APKG_SCHEMA)?;
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO col VALUES (NULL, ?1, ?2, ?3, ?4, 0, 0, 0, ?5, ?6, ?7, ?8, '{}')",
            params![
                COLLECTION_CREATED,
                millis,
                millis,
                SCHEMA_VERSION,
                collection_conf(model.id).to_string(),
                models.to_string(),
                decks.to_string(),
                collection_dconf().to_string(),
            ],
        )?;

        for (i, card) in deck.cards().iter().enumerate() {
            let id = millis + i as i64;
            let fields = format!("{}\x1f{}", card.question(), card.answer());
            tx.execute(
                "INSERT INTO notes VALUES (?1, ?2, ?3, ?4, -1, '', ?5, ?6, ?7, 0, '')",
                params![
                    id,
                    note_guid(&fields),
                    model.id,
                    secs,
                    fields,
                    card.question(),
                    field_checksum(card.question()),
                ],
            )?;
            tx.execute(
                "INSERT INTO cards VALUES (?1, ?1, ?2, 0, ?3, -1, 0, 0, ?4, 0, 0, 0, 0, 0, 0, 0, 0, '')",
                params![id, deck.id(), secs, i as i64 + 1],
            )?;
        }
        tx.commit()?;
        debug!("Collection written to {}", path.display());
        Ok(())
    }
}

fn entry_options() -> SimpleFileOptions {
    SimpleFileOptions::default().compression_method(CompressionMethod::Deflated)
}

fn sha1_hex(text: &str) -> String {
    format!("{:x}", Sha1::digest(text.as_bytes()))
}

/// Stable note id derived from the note's fields.
fn note_guid(fields: &str) -> String {
    sha1_hex(fields)[..16].to_string()
}

/// Anki's duplicate-detection checksum of a sort field.
fn field_checksum(field: &str) -> i64 {
    let text = MEDIA_TAG.replace_all(field, " ${1} ");
    let text = HTML_TAG.replace_all(&text, "");
    i64::from_str_radix(&sha1_hex(&text)[..8], 16).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{cards::Card, deck::model::NOTATION_MODEL};
    use std::io::Read;

    #[test]
    fn test_field_checksum_strips_media() {
        assert_eq!(
            field_checksum("<img src='board.svg'>"),
            field_checksum(" board.svg ")
        );
        assert_ne!(field_checksum("1. ?"), field_checksum("1... ?"));
    }

    #[test]
    fn test_field_checksum_known_values() {
        assert_eq!(field_checksum("1. ?"), 0xe1faabcb);
        assert_eq!(field_checksum("<img src='board.svg'>"), 0xa5d07baf);
    }

    #[test]
    fn test_write_notation_package() {
        let scratch = tempfile::tempdir().unwrap();
        let out = scratch.path().join("out.apkg");
        let mut deck = Deck::with_id(1234567890, "Fool's Mate", &NOTATION_MODEL);
        deck.add_card(Card::new("1. ?", "1.f3"));
        deck.add_card(Card::new("1... ?", "1... e6"));
        Package::new(&deck, Vec::new()).write_to_file(&out).unwrap();

        let mut archive = zip::ZipArchive::new(File::open(&out).unwrap()).unwrap();
        let mut media = String::new();
        archive.by_name("media").unwrap().read_to_string(&mut media).unwrap();
        assert_eq!(media, "{}");

        let collection = scratch.path().join("collection.anki2");
        let mut bytes = Vec::new();
        archive
            .by_name("collection.anki2")
            .unwrap()
            .read_to_end(&mut bytes)
            .unwrap();
        fs::write(&collection, bytes).unwrap();

        let conn = Connection::open(&collection).unwrap();
        let flds: Vec<String> = conn
            .prepare("SELECT flds FROM notes ORDER BY id")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<_, _>>()
            .unwrap();
        assert_eq!(flds, ["1. ?\x1f1.f3", "1... ?\x1f1... e6"]);

        let did: i64 = conn
            .query_row("SELECT DISTINCT did FROM cards", [], |row| row.get(0))
            .unwrap();
        assert_eq!(did, 1234567890);

        let decks: String = conn
            .query_row("SELECT decks FROM col", [], |row| row.get(0))
            .unwrap();
        let decks: serde_json::Value = serde_json::from_str(&decks).unwrap();
        assert_eq!(decks["1234567890"]["name"], "Fool's Mate");
    }

    #[test]
    fn test_missing_media_fails() {
        let scratch = tempfile::tempdir().unwrap();
        let deck = Deck::with_id(1 << 30, "Empty", &NOTATION_MODEL);
        let media = vec![scratch.path().join("missing.svg")];
        let result = Package::new(&deck, media).write_to_file(&scratch.path().join("out.apkg"));
        assert!(matches!(result, Err(crate::error::Error::Io(_))));
    }
}
