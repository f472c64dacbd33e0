use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tabrs_support::NonEmptyString;

pub type Object = Map<String, Value>;

pub fn deserialize<T>(value: Value) -> Result<T>
where
    T: DeserializeOwned,
{
    serde_json::from_value(value).map_err(Error::from)
}

pub fn get_value<'a>(object: &'a Object, key: &str) -> Option<&'a Value> {
    object.get(key).filter(|value| !value.is_null())
}

pub fn optional_u64(object: &Object, key: &str) -> Result<Option<u64>> {
    get_value(object, key)
        .map(|value| {
            value
                .as_u64()
                .ok_or_else(|| Error::invalid_value(key, "non-negative integer"))
        })
        .transpose()
}

pub fn optional_string(object: &Object, key: &str) -> Result<Option<String>> {
    get_value(object, key)
        .map(|value| {
            value
                .as_str()
                .map(str::to_string)
                .ok_or_else(|| Error::invalid_value(key, "string"))
        })
        .transpose()
}

pub fn optional_nonempty_string(object: &Object, key: &str) -> Result<Option<NonEmptyString>> {
    optional_string(object, key)?
        .map(|value| NonEmptyString::try_new(value).map_err(|_| Error::empty_value(key)))
        .transpose()
}
