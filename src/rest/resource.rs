//! The generic resource model.
//!
//! Every domain entity (user, repository, issue, ...) is one JSON object
//! returned by the API. [`ResourceCore`] holds what all of them share: the
//! raw object, the self link it can be re-fetched from, and the cache tokens
//! of the response that produced it. The [`Resource`] trait layers typed
//! fields, identity, attribute fallback and conditional refresh on top.
//!
//! # Implementing a Resource
//!
//! 1. Define a struct holding a `ResourceCore` plus typed fields
//! 2. Implement [`Resource::populate`] to read the typed fields from the core
//! 3. Derive equality from identity with [`impl_resource_identity!`]
//!
//! ```rust
//! use github_api::impl_resource_identity;
//! use github_api::rest::{ApiError, Resource, ResourceCore};
//! use serde_json::json;
//!
//! #[derive(Clone, Debug)]
//! pub struct Gist {
//!     core: ResourceCore,
//!     pub id: String,
//!     pub description: Option<String>,
//! }
//!
//! impl Resource for Gist {
//!     const NAME: &'static str = "Gist";
//!
//!     fn populate(core: ResourceCore) -> Result<Self, ApiError> {
//!         Ok(Self {
//!             id: core.required(Self::NAME, "id")?,
//!             description: core.optional("description"),
//!             core,
//!         })
//!     }
//!
//!     fn core(&self) -> &ResourceCore {
//!         &self.core
//!     }
//! }
//!
//! impl_resource_identity!(Gist);
//!
//! let gist = Gist::from_json(json!({
//!     "id": "aa5a315d61ae9438b18d",
//!     "url": "https://api.github.com/gists/aa5a315d61ae9438b18d",
//!     "public": true
//! })).unwrap();
//!
//! assert_eq!(gist.id, "aa5a315d61ae9438b18d");
//! assert_eq!(gist.attr("public").unwrap(), &json!(true));
//! assert!(gist.attr("forks").is_err());
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::clients::{HttpResponse, Transport};
use crate::rest::{expect_json, json_type_name, params, ApiError};
use crate::RestClient;

/// Key under which a response's `ETag` is embedded into a JSON object.
pub const ETAG_KEY: &str = "__etag";

/// Key under which a response's `Last-Modified` is embedded into a JSON object.
pub const LAST_MODIFIED_KEY: &str = "__last_modified";

const SELF_LINK_KEY: &str = "url";

/// The `ETag` / `Last-Modified` pair of the response that produced a resource.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CacheTokens {
    /// The `ETag` header value.
    pub etag: Option<String>,
    /// The `Last-Modified` header value (an HTTP-date).
    pub last_modified: Option<String>,
}

impl CacheTokens {
    /// Reads the tokens from a response's headers.
    #[must_use]
    pub fn from_response(response: &HttpResponse) -> Self {
        Self {
            etag: response.etag().map(ToString::to_string),
            last_modified: response.last_modified().map(ToString::to_string),
        }
    }

    /// Returns `true` if neither token is present.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.etag.is_none() && self.last_modified.is_none()
    }

    /// The single conditional header a refresh should send.
    ///
    /// `If-Modified-Since` takes precedence; `If-None-Match` is used only
    /// when no `Last-Modified` token exists.
    #[must_use]
    pub fn conditional_header(&self) -> Option<(&'static str, &str)> {
        self.last_modified
            .as_deref()
            .map(|value| ("If-Modified-Since", value))
            .or_else(|| self.etag.as_deref().map(|value| ("If-None-Match", value)))
    }

    /// Parses `last_modified` as a timestamp.
    #[must_use]
    pub fn last_modified_at(&self) -> Option<DateTime<Utc>> {
        self.last_modified
            .as_deref()
            .and_then(params::parse_http_date)
    }
}

/// The state every resource shares.
///
/// A core built from `null` is a "null resource": it has no data, no self
/// link and no identity, and every typed field reads as its default.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResourceCore {
    raw: Option<Map<String, Value>>,
    url: Option<String>,
    cache: CacheTokens,
}

impl ResourceCore {
    /// Builds a core from a JSON object or `null`.
    ///
    /// Cache tokens embedded under [`ETAG_KEY`] / [`LAST_MODIFIED_KEY`] are
    /// moved out of the raw data into [`cache_tokens`](Self::cache_tokens).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::UnprocessableResponseBody`] for any other JSON type.
    pub fn from_json(json: Value) -> Result<Self, ApiError> {
        let mut raw = match json {
            Value::Null => return Ok(Self::default()),
            Value::Object(map) => map,
            other => {
                return Err(ApiError::UnprocessableResponseBody {
                    expected: "a JSON object",
                    actual: json_type_name(&other),
                })
            }
        };

        let cache = CacheTokens {
            etag: take_string(&mut raw, ETAG_KEY),
            last_modified: take_string(&mut raw, LAST_MODIFIED_KEY),
        };
        let url = raw
            .get(SELF_LINK_KEY)
            .and_then(Value::as_str)
            .map(ToString::to_string);

        Ok(Self {
            raw: Some(raw),
            url,
            cache,
        })
    }

    /// Returns `true` if this core was built from `null`.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        self.raw.is_none()
    }

    /// The raw JSON object, without injected cache tokens.
    #[must_use]
    pub const fn raw(&self) -> Option<&Map<String, Value>> {
        self.raw.as_ref()
    }

    /// The self link.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// The cache tokens of the response that produced this core.
    #[must_use]
    pub const fn cache_tokens(&self) -> &CacheTokens {
        &self.cache
    }

    /// Looks up a raw value. JSON `null` reads as absent.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.raw
            .as_ref()
            .and_then(|raw| raw.get(key))
            .filter(|value| !value.is_null())
    }

    /// Reads a mandatory field.
    ///
    /// On a null core this returns `T::default()`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::IncompleteResource`] naming `key` if the field is
    /// absent, `null`, or of the wrong type.
    pub fn required<T: DeserializeOwned + Default>(
        &self,
        resource: &'static str,
        key: &str,
    ) -> Result<T, ApiError> {
        if self.is_null() {
            return Ok(T::default());
        }
        self.get(key)
            .and_then(|value| T::deserialize(value).ok())
            .ok_or_else(|| ApiError::IncompleteResource {
                resource,
                field: key.to_string(),
            })
    }

    /// Reads an optional field. Absent, `null` and mistyped values read as `None`.
    #[must_use]
    pub fn optional<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.get(key).and_then(|value| T::deserialize(value).ok())
    }

    /// Reads an ISO-8601 timestamp field.
    #[must_use]
    pub fn timestamp(&self, key: &str) -> Option<DateTime<Utc>> {
        self.get(key)
            .and_then(Value::as_str)
            .and_then(params::parse_timestamp)
    }

    /// Builds an embedded object as a nested resource.
    ///
    /// # Errors
    ///
    /// Propagates the nested resource's construction error.
    pub fn nested<R: Resource>(&self, key: &str) -> Result<Option<R>, ApiError> {
        self.get(key).cloned().map(R::from_json).transpose()
    }

    /// The raw data as a JSON value (`null` for a null core).
    #[must_use]
    pub fn as_value(&self) -> Value {
        self.raw.clone().map_or(Value::Null, Value::Object)
    }
}

fn take_string(raw: &mut Map<String, Value>, key: &str) -> Option<String> {
    match raw.remove(key) {
        Some(Value::String(s)) => Some(s),
        _ => None,
    }
}

/// The key a resource is compared and hashed by.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Identity {
    /// The canonical API URL.
    Url(String),
    /// A numeric ID.
    Id(u64),
    /// A name unique within its collection.
    Name(String),
}

/// One domain entity backed by one JSON object.
///
/// Implementors provide the per-type hook ([`populate`](Self::populate)) and
/// access to their [`ResourceCore`]; construction, in-place repopulation,
/// attribute fallback, serialization and refresh are provided.
#[allow(async_fn_in_trait)]
pub trait Resource: Sized {
    /// Type name used in error messages.
    const NAME: &'static str;

    /// Reads typed fields out of `core` and takes ownership of it.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::IncompleteResource`] if a mandatory key is absent.
    fn populate(core: ResourceCore) -> Result<Self, ApiError>;

    /// Returns the shared state.
    fn core(&self) -> &ResourceCore;

    /// The uniqueness key. Defaults to the self link.
    fn identity(&self) -> Option<Identity> {
        self.core().url().map(|url| Identity::Url(url.to_string()))
    }

    /// Builds a resource from a JSON object, or a null resource from `null`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::UnprocessableResponseBody`] for a non-object, or
    /// the hook's [`ApiError::IncompleteResource`].
    fn from_json(json: Value) -> Result<Self, ApiError> {
        Self::populate(ResourceCore::from_json(json)?)
    }

    /// Replaces this resource's entire state from new JSON.
    ///
    /// On error the resource is left untouched.
    ///
    /// # Errors
    ///
    /// Same as [`from_json`](Self::from_json).
    fn repopulate_from(&mut self, json: Value) -> Result<(), ApiError> {
        *self = Self::from_json(json)?;
        Ok(())
    }

    /// Returns `true` for a null resource.
    fn is_null(&self) -> bool {
        self.core().is_null()
    }

    /// The self link.
    fn url(&self) -> Option<&str> {
        self.core().url()
    }

    /// Cache tokens of the response that produced this resource.
    fn cache_tokens(&self) -> &CacheTokens {
        self.core().cache_tokens()
    }

    /// Reads any field the API returned, typed or not.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::UnknownAttribute`] if the raw data has no such key.
    fn attr(&self, name: &str) -> Result<&Value, ApiError> {
        self.core()
            .raw()
            .and_then(|raw| raw.get(name))
            .ok_or_else(|| ApiError::UnknownAttribute {
                resource: Self::NAME,
                name: name.to_string(),
            })
    }

    /// Reads a field and deserializes it.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::UnknownAttribute`] if absent, or
    /// [`ApiError::Serialization`] if the value has the wrong shape.
    fn attr_as<V: DeserializeOwned>(&self, name: &str) -> Result<V, ApiError> {
        Ok(V::deserialize(self.attr(name)?)?)
    }

    /// The raw data, verbatim.
    fn as_value(&self) -> Value {
        self.core().as_value()
    }

    /// The raw data encoded as JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Serialization`] if encoding fails.
    fn to_json(&self) -> Result<String, ApiError> {
        Ok(serde_json::to_string(&self.as_value())?)
    }

    /// Re-fetches this resource from its self link.
    ///
    /// With `conditional`, sends the header chosen by
    /// [`CacheTokens::conditional_header`]; a 304 leaves the resource
    /// untouched. Any returned body replaces the state wholesale. Returns the
    /// same instance either way.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::IncompleteResource`] if there is no self link, or
    /// the status-mapped error for any status >= 400.
    async fn refresh<T: Transport>(
        &mut self,
        client: &RestClient<T>,
        conditional: bool,
    ) -> Result<&mut Self, ApiError> {
        let url = self
            .url()
            .ok_or(ApiError::IncompleteResource {
                resource: Self::NAME,
                field: SELF_LINK_KEY.to_string(),
            })?
            .to_string();

        let mut headers = HashMap::new();
        if conditional {
            if let Some((name, value)) = self.cache_tokens().conditional_header() {
                headers.insert(name.to_string(), value.to_string());
            }
        }

        let response = client.get_with_headers(&url, None, &headers).await?;
        if response.is_not_modified() {
            tracing::debug!(resource = Self::NAME, url = %url, "Resource not modified");
            return Ok(self);
        }

        let body = expect_json(&response)?;
        if !body.is_null() {
            self.repopulate_from(body)?;
        }
        Ok(self)
    }
}

/// Implements `PartialEq`, `Eq` and `Hash` from [`Resource::identity`].
///
/// Two null resources (no identity) compare equal.
#[macro_export]
macro_rules! impl_resource_identity {
    ($($ty:ty),+ $(,)?) => {$(
        impl ::std::cmp::PartialEq for $ty {
            fn eq(&self, other: &Self) -> bool {
                $crate::rest::Resource::identity(self) == $crate::rest::Resource::identity(other)
            }
        }

        impl ::std::cmp::Eq for $ty {}

        impl ::std::hash::Hash for $ty {
            fn hash<H: ::std::hash::Hasher>(&self, state: &mut H) {
                ::std::hash::Hash::hash(&$crate::rest::Resource::identity(self), state);
            }
        }
    )+};
}
