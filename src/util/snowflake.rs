//! Serde helpers storing Discord snowflakes as decimal strings.
//!
//! JSON numbers lose precision above 2^53 in most readers, so every id in the store
//! files is written as a string. Reading accepts either form.
//!
//! Use with `#[serde(with = "crate::util::snowflake")]`, or the `option` / `list`
//! sub-modules for `Option<u64>` and `Vec<u64>` fields.

use serde::{de, Deserialize, Deserializer, Serializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(u64),
}

impl RawId {
    fn into_u64<E: de::Error>(self) -> Result<u64, E> {
        match self {
            Self::Number(id) => Ok(id),
            Self::Text(text) => text
                .parse::<u64>()
                .map_err(|e| E::custom(format!("invalid snowflake '{}': {}", text, e))),
        }
    }
}

pub fn serialize<S: Serializer>(id: &u64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(id)
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    RawId::deserialize(deserializer)?.into_u64()
}

pub mod option {
    use super::RawId;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(id: &Option<u64>, serializer: S) -> Result<S::Ok, S::Error> {
        match id {
            Some(id) => serializer.collect_str(id),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<u64>, D::Error> {
        Option::<RawId>::deserialize(deserializer)?
            .map(RawId::into_u64)
            .transpose()
    }
}

pub mod list {
    use super::RawId;
    use serde::{ser::SerializeSeq, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ids: &[u64], serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(ids.len()))?;
        for id in ids {
            seq.serialize_element(&id.to_string())?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u64>, D::Error> {
        Vec::<RawId>::deserialize(deserializer)?
            .into_iter()
            .map(RawId::into_u64)
            .collect()
    }
}

pub mod option_list {
    use super::RawId;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        ids: &Option<Vec<u64>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match ids {
            Some(ids) => super::list::serialize(ids, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Vec<u64>>, D::Error> {
        Option::<Vec<RawId>>::deserialize(deserializer)?
            .map(|ids| ids.into_iter().map(RawId::into_u64).collect())
            .transpose()
    }
}
