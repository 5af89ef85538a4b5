use serde::{de::DeserializeOwned, Serialize};

/// A record exchanged on the wire, wrapped as `{"<NAME>": {...}}`.
pub trait Message: Serialize + DeserializeOwned {
    const NAME: &'static str;

    fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        let mut wrapped = serde_json::Map::new();
        wrapped.insert(Self::NAME.to_string(), serde_json::to_value(self)?);
        Ok(serde_json::Value::Object(wrapped))
    }

    fn from_json(message: &str) -> Result<Self, serde_json::Error> {
        let mut v: serde_json::Value = serde_json::from_str(message)?;
        match v.get_mut(Self::NAME) {
            Some(inner) => serde_json::from_value(inner.take()),
            None => Err(serde::de::Error::custom(format!(
                "expected a {} message",
                Self::NAME
            ))),
        }
    }
}
