use crate::{
    error::{CoreError, Result},
    model::{CardKey, CardRecord, CardType, CharacterKey, CharacterRecord},
};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    sync::mpsc::{self, Receiver, TryRecvError},
    thread,
};

/// Read-only lookup over loaded records.
///
/// The selection store and the event filter only ever see records through this
/// trait, so any provider (disk catalog, fixtures, a hot-reloaded table) fits.
pub trait RecordSource {
    fn card(&self, key: &str) -> Option<&CardRecord>;

    fn character(&self, name: &str) -> Option<&CharacterRecord>;

    fn has_card(&self, key: &str) -> bool {
        self.card(key).is_some()
    }

    fn has_character(&self, name: &str) -> bool {
        self.character(name).is_some()
    }
}

/// Cards indexed by image path and characters indexed by name
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    cards: HashMap<CardKey, CardRecord>,
    characters: HashMap<CharacterKey, CharacterRecord>,
}

impl RecordSource for Catalog {
    fn card(&self, key: &str) -> Option<&CardRecord> {
        self.cards.get(key)
    }

    fn character(&self, name: &str) -> Option<&CharacterRecord> {
        self.characters.get(name)
    }
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from records already in memory. Later duplicates win.
    pub fn from_records(
        cards: impl IntoIterator<Item = CardRecord>,
        characters: impl IntoIterator<Item = CharacterRecord>,
    ) -> Self {
        let mut catalog = Self::new();
        for card in cards {
            catalog.insert_card(card);
        }
        for character in characters {
            catalog.insert_character(character);
        }
        catalog
    }

    pub fn insert_card(&mut self, card: CardRecord) -> Option<CardRecord> {
        self.cards.insert(card.image.clone(), card)
    }

    pub fn insert_character(&mut self, character: CharacterRecord) -> Option<CharacterRecord> {
        self.characters.insert(character.name.clone(), character)
    }

    pub fn card_count(&self) -> usize {
        self.cards.len()
    }

    pub fn character_count(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty() && self.characters.is_empty()
    }

    /// Load both tables from their directories
    pub fn load(cards_dir: &Path, characters_dir: &Path) -> Result<Self> {
        let catalog = Self {
            cards: load_cards(cards_dir)?,
            characters: load_characters(characters_dir)?,
        };
        tracing::info!(
            cards = catalog.card_count(),
            characters = catalog.character_count(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    /// Characters sorted by name, for the picker
    pub fn characters_sorted(&self) -> Vec<&CharacterRecord> {
        let mut characters: Vec<&CharacterRecord> = self.characters.values().collect();
        characters.sort_by(|a, b| a.name.cmp(&b.name));
        characters
    }

    /// Cards of one type, rarest first, then by key
    pub fn cards_of_type(&self, card_type: CardType) -> Vec<&CardRecord> {
        let mut cards: Vec<&CardRecord> = self
            .cards
            .values()
            .filter(|card| card_type.matches_key(&card.image))
            .collect();
        cards.sort_by(|a, b| {
            a.rarity()
                .cmp(&b.rarity())
                .then_with(|| a.image.cmp(&b.image))
        });
        cards
    }
}

/// Load characters from a directory (not recursive), keyed by `nome`.
pub fn load_characters(dir: &Path) -> Result<HashMap<CharacterKey, CharacterRecord>> {
    let mut characters = HashMap::new();
    for path in json_files(dir, false) {
        let Some(character) = read_record::<CharacterRecord>(&path) else {
            continue;
        };
        if character.name.is_empty() {
            tracing::warn!(path = %path.display(), "character JSON without 'nome', skipping");
            continue;
        }
        if characters.contains_key(&character.name) {
            tracing::warn!(name = %character.name, path = %path.display(), "duplicate character");
        }
        characters.insert(character.name.clone(), character);
    }
    Ok(characters)
}

/// Load cards recursively, keyed by `imagem` so cards may share a display name.
pub fn load_cards(dir: &Path) -> Result<HashMap<CardKey, CardRecord>> {
    let mut cards = HashMap::new();
    for path in json_files(dir, true) {
        let Some(card) = read_record::<CardRecord>(&path) else {
            continue;
        };
        if card.name.is_empty() || card.image.is_empty() {
            tracing::warn!(path = %path.display(), "card missing 'nome' or 'imagem', skipping");
            continue;
        }
        if cards.contains_key(&card.image) {
            tracing::warn!(image = %card.image, path = %path.display(), "duplicate card image");
        }
        cards.insert(card.image.clone(), card);
    }
    Ok(cards)
}

fn read_record<T: serde::de::DeserializeOwned>(path: &Path) -> Option<T> {
    let parsed = fs::read_to_string(path)
        .map_err(CoreError::from)
        .and_then(|contents| serde_json::from_str(&contents).map_err(CoreError::from));
    match parsed {
        Ok(record) => Some(record),
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "failed to read record");
            None
        }
    }
}

/// Collect `*.json` files under `dir`, sorted so loading order is reproducible.
/// A missing directory yields nothing; unreadable directories and entries are
/// logged and skipped.
fn json_files(dir: &Path, recursive: bool) -> Vec<PathBuf> {
    let mut files = Vec::new();
    if !dir.is_dir() {
        tracing::warn!(dir = %dir.display(), "directory not found");
        return files;
    }

    let mut pending = vec![dir.to_path_buf()];
    while let Some(current) = pending.pop() {
        let entries = match fs::read_dir(&current) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::error!(dir = %current.display(), error = %e, "cannot read directory, skipping");
                continue;
            }
        };
        for entry in entries {
            let path = match entry {
                Ok(entry) => entry.path(),
                Err(e) => {
                    tracing::error!(dir = %current.display(), error = %e, "cannot read directory entry, skipping");
                    continue;
                }
            };
            if path.is_dir() {
                if recursive {
                    pending.push(path);
                }
            } else if path.extension().map_or(false, |ext| ext == "json") {
                files.push(path);
            }
        }
    }

    files.sort();
    files
}

/// Catalog loading on a worker thread.
///
/// The front-end polls [`CatalogLoader::poll`] from its event loop and must not
/// accept selection input until it yields the catalog.
pub struct CatalogLoader {
    rx: Receiver<Result<Catalog>>,
}

impl CatalogLoader {
    pub fn spawn(cards_dir: PathBuf, characters_dir: PathBuf) -> Self {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let result = Catalog::load(&cards_dir, &characters_dir);
            let _ = tx.send(result);
        });
        Self { rx }
    }

    /// `None` while loading is still in progress
    pub fn poll(&self) -> Option<Result<Catalog>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(CoreError::LoaderDisconnected)),
        }
    }

    /// Block until the worker reports
    pub fn wait(self) -> Result<Catalog> {
        self.rx.recv().map_err(|_| CoreError::LoaderDisconnected)?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EventBook, Rarity};

    fn card(image: &str, name: &str) -> CardRecord {
        CardRecord {
            name: name.to_string(),
            image: image.to_string(),
            events: EventBook::new(),
        }
    }

    #[test]
    fn cards_of_type_sorted_by_rarity_then_key() {
        let catalog = Catalog::from_records(
            vec![
                card("cards/speed/b_R.png", "B"),
                card("cards/speed/a_SR.png", "A"),
                card("cards/speed/c_SSR.png", "C"),
                card("cards/speed/a_SSR.png", "A2"),
                card("cards/power/p_SSR.png", "P"),
            ],
            vec![],
        );

        let keys: Vec<&str> = catalog
            .cards_of_type(CardType::Speed)
            .iter()
            .map(|c| c.image.as_str())
            .collect();
        assert_eq!(
            keys,
            vec![
                "cards/speed/a_SSR.png",
                "cards/speed/c_SSR.png",
                "cards/speed/a_SR.png",
                "cards/speed/b_R.png",
            ]
        );
        assert_eq!(catalog.cards_of_type(CardType::Guts).len(), 0);
        assert_eq!(
            catalog.card("cards/power/p_SSR.png").map(|c| c.rarity()),
            Some(Rarity::Ssr)
        );
    }

    #[test]
    fn cards_sharing_a_name_stay_distinct() {
        let catalog = Catalog::from_records(
            vec![card("speed_SSR.png", "Same"), card("speed_SR.png", "Same")],
            vec![],
        );
        assert_eq!(catalog.card_count(), 2);
    }

    #[test]
    fn missing_directories_yield_empty_catalog() {
        let catalog = Catalog::load(
            Path::new("/nonexistent/cards"),
            Path::new("/nonexistent/cavalas"),
        )
        .unwrap();
        assert!(catalog.is_empty());
    }
}
