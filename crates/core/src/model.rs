use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Cards are identified by their image path, which is unique per type and rarity.
pub type CardKey = String;

/// Characters are identified by their display name.
pub type CharacterKey = String;

/// A titled text entry inside a category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "nome", default)]
    pub title: String,

    /// Raw detail text, bold markup left in place
    #[serde(rename = "detalhes", default, deserialize_with = "detail_text")]
    pub detail: String,
}

impl Event {
    pub fn new<T: Into<String>, D: Into<String>>(title: T, detail: D) -> Self {
        Self {
            title: title.into(),
            detail: detail.into(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DetailText {
    Text(String),
    Lines(Vec<String>),
}

fn detail_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match DetailText::deserialize(deserializer)? {
        DetailText::Text(text) => text,
        DetailText::Lines(lines) => lines.join("\n"),
    })
}

/// A named group of events
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub events: Vec<Event>,
}

/// Categories of a record, kept in the order they were declared in the asset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventBook {
    categories: Vec<Category>,
}

impl EventBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append events to `name`, creating the category at the end if it is new.
    pub fn push<S: Into<String>>(&mut self, name: S, events: Vec<Event>) {
        let name = name.into();
        match self.categories.iter_mut().find(|c| c.name == name) {
            Some(existing) => existing.events.extend(events),
            None => self.categories.push(Category { name, events }),
        }
    }

    pub fn with<S: Into<String>>(mut self, name: S, events: Vec<Event>) -> Self {
        self.push(name, events);
        self
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn event_count(&self) -> usize {
        self.categories.iter().map(|c| c.events.len()).sum()
    }
}

impl Serialize for EventBook {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.categories.len()))?;
        for category in &self.categories {
            map.serialize_entry(&category.name, &category.events)?;
        }
        map.end()
    }
}

struct EventBookVisitor;

impl<'de> Visitor<'de> for EventBookVisitor {
    type Value = EventBook;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of category name to event list")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut book = EventBook::new();
        while let Some((name, events)) = access.next_entry::<String, Vec<Event>>()? {
            book.push(name, events);
        }
        Ok(book)
    }
}

impl<'de> Deserialize<'de> for EventBook {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(EventBookVisitor)
    }
}

/// Support card record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardRecord {
    #[serde(rename = "nome", default)]
    pub name: String,

    #[serde(rename = "imagem", default)]
    pub image: String,

    #[serde(rename = "eventos", default)]
    pub events: EventBook,
}

impl CardRecord {
    pub fn card_type(&self) -> Option<CardType> {
        CardType::from_key(&self.image)
    }

    pub fn rarity(&self) -> Rarity {
        Rarity::from_key(&self.image)
    }
}

/// Character ("cavala") record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterRecord {
    #[serde(rename = "nome", default)]
    pub name: String,

    #[serde(rename = "imagem", default)]
    pub image: String,

    #[serde(rename = "eventos", default)]
    pub events: EventBook,
}

/// Support card type, inferred from the card key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardType {
    Speed,
    Wisdom,
    Power,
    Stamina,
    Guts,
    Pal,
}

impl Default for CardType {
    fn default() -> Self {
        Self::Speed
    }
}

impl CardType {
    pub const ALL: [CardType; 6] = [
        Self::Speed,
        Self::Wisdom,
        Self::Power,
        Self::Stamina,
        Self::Guts,
        Self::Pal,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Speed => "speed",
            Self::Wisdom => "wisdom",
            Self::Power => "power",
            Self::Stamina => "stamina",
            Self::Guts => "guts",
            Self::Pal => "pal",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Speed => Self::Wisdom,
            Self::Wisdom => Self::Power,
            Self::Power => Self::Stamina,
            Self::Stamina => Self::Guts,
            Self::Guts => Self::Pal,
            Self::Pal => Self::Speed,
        }
    }

    /// Whether a card key belongs to this type (the key contains the type name).
    pub fn matches_key(self, key: &str) -> bool {
        key.contains(self.as_str())
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.matches_key(key))
    }
}

/// Card rarity, inferred from the image suffix. Ordered rarest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rarity {
    Ssr,
    Sr,
    R,
    Unknown,
}

impl Rarity {
    pub fn from_key(key: &str) -> Self {
        if key.ends_with("_SSR.png") {
            Self::Ssr
        } else if key.ends_with("_SR.png") {
            Self::Sr
        } else if key.ends_with("_R.png") {
            Self::R
        } else {
            Self::Unknown
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Ssr => "SSR",
            Self::Sr => "SR",
            Self::R => "R",
            Self::Unknown => "?",
        }
    }
}

/// How search text is compared against event titles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchMode {
    /// Title starts with the query
    Prefix,
    /// Title contains the query anywhere
    Contains,
}

impl Default for MatchMode {
    fn default() -> Self {
        Self::Prefix
    }
}

/// Theme configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Theme {
    Dark,
    Light,
}

impl Default for Theme {
    fn default() -> Self {
        Self::Dark
    }
}
