use std::collections::HashMap;

/// Name -> value mapping the dispatcher attaches to a matched request,
/// retrievable through [`crate::ext::RequestExt`] or
/// [`crate::context::ResponseContext::url_param`].
#[derive(Debug, Clone, Default)]
pub struct ParamMap(HashMap<String, String>);

impl ParamMap {
    pub fn new() -> ParamMap {
        ParamMap(HashMap::new())
    }

    pub fn with_capacity(capacity: usize) -> ParamMap {
        ParamMap(HashMap::with_capacity(capacity))
    }

    pub fn set<N: Into<String>, V: Into<String>>(&mut self, param_name: N, param_val: V) {
        self.0.insert(param_name.into(), param_val.into());
    }

    pub fn get(&self, param_name: &str) -> Option<&str> {
        self.0.get(param_name).map(String::as_str)
    }

    pub fn has(&self, param_name: &str) -> bool {
        self.0.contains_key(param_name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn extend(&mut self, other: ParamMap) {
        for (key, val) in other.0 {
            self.0.insert(key, val);
        }
    }
}
