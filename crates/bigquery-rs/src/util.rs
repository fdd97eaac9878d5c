/// BigQuery encodes int64 values as JSON strings.
pub(crate) mod int64_str {
    pub(crate) mod optional {
        use serde::Deserialize;

        #[derive(Deserialize)]
        #[serde(untagged)]
        enum StrOrInt {
            Str(String),
            Int(u64),
        }

        pub(crate) fn serialize<S>(value: &Option<u64>, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: serde::Serializer,
        {
            match value {
                Some(int) => serializer.collect_str(int),
                None => serializer.serialize_none(),
            }
        }

        pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
        where
            D: serde::Deserializer<'de>,
        {
            match Option::<StrOrInt>::deserialize(deserializer)? {
                None => Ok(None),
                Some(StrOrInt::Int(int)) => Ok(Some(int)),
                Some(StrOrInt::Str(s)) => s.parse().map(Some).map_err(serde::de::Error::custom),
            }
        }
    }
}

#[inline]
pub(crate) const fn is_false(b: &bool) -> bool {
    !*b
}
