//! Helpers to decode loosely typed BSON values into the strict types the API
//! exposes.

use mongodb::bson::Bson;
use serde::{de::Error, Deserialize, Deserializer};


/// An opaque document identifier. Stored as string, ObjectId or integer; always
/// exposed as string (ObjectIds as 24 character hex).
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DocumentId(pub(crate) String);

impl<'de> Deserialize<'de> for DocumentId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = match Bson::deserialize(deserializer)? {
            Bson::String(s) => s,
            Bson::ObjectId(oid) => oid.to_hex(),
            Bson::Int32(i) => i.to_string(),
            Bson::Int64(i) => i.to_string(),
            other => return Err(D::Error::custom(
                format!("invalid document ID: expected string, ObjectId or integer, got {other}"),
            )),
        };

        Ok(Self(s))
    }
}

/// Deserializes a 32 bit integer that might be stored as any BSON number, as
/// long as it's integral and in range.
pub(crate) fn deserialize_i32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i32, D::Error> {
    let out = match Bson::deserialize(deserializer)? {
        Bson::Int32(i) => Some(i),
        Bson::Int64(i) => i32::try_from(i).ok(),
        Bson::Double(f) if f.fract() == 0.0 && f >= i32::MIN as f64 && f <= i32::MAX as f64 => {
            Some(f as i32)
        }
        _ => None,
    };

    out.ok_or_else(|| D::Error::custom("expected a 32 bit integer"))
}


#[cfg(test)]
mod tests {
    use mongodb::bson::{self, doc, oid::ObjectId};
    use serde::Deserialize;

    use super::{deserialize_i32, DocumentId};

    #[derive(Debug, Deserialize)]
    struct Id {
        id: DocumentId,
    }

    #[derive(Debug, Deserialize)]
    struct Num {
        #[serde(deserialize_with = "deserialize_i32")]
        n: i32,
    }

    #[test]
    fn document_id_variants() {
        let oid = ObjectId::parse_str("64b7f0c2a1b2c3d4e5f60718").unwrap();
        let cases = [
            (doc! { "id": "abc" }, "abc"),
            (doc! { "id": oid }, "64b7f0c2a1b2c3d4e5f60718"),
            (doc! { "id": 17_i32 }, "17"),
            (doc! { "id": 9_000_000_000_i64 }, "9000000000"),
        ];

        for (doc, expected) in cases {
            let id: Id = bson::from_document(doc).unwrap();
            assert_eq!(id.id, DocumentId(expected.into()));
        }

        bson::from_document::<Id>(doc! { "id": true }).unwrap_err();
        bson::from_document::<Id>(doc! { "id": 1.5 }).unwrap_err();
    }

    #[test]
    fn lenient_i32() {
        let n = |doc| bson::from_document::<Num>(doc).map(|num| num.n);

        assert_eq!(n(doc! { "n": 30_i32 }).unwrap(), 30);
        assert_eq!(n(doc! { "n": 30_i64 }).unwrap(), 30);
        assert_eq!(n(doc! { "n": 30.0 }).unwrap(), 30);
        assert_eq!(n(doc! { "n": -4.0 }).unwrap(), -4);
        n(doc! { "n": 30.5 }).unwrap_err();
        n(doc! { "n": 3_000_000_000_i64 }).unwrap_err();
        n(doc! { "n": "30" }).unwrap_err();
    }
}
