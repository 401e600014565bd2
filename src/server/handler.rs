//! Resource handlers.
//!
//! Each handler validates the method for its resource, applies the state
//! transition and describes the response as a [`Reply`]. Failures come back as
//! [`Error`]s whose [`Error::status`] decides what the client sees.

use log::{debug, info, warn};
use serde::Deserialize;
use serde_json::Value;
use tokio::io::AsyncRead;

use crate::device::{DeviceState, FileStore};
use crate::parser::{JsonCodec, Method, Request};
use crate::server::actions::{ActionEffect, ActionRegistry};
use crate::server::error::Error;
use crate::server::response::{Body, ContentType, Reply, StatusCode};
use crate::server::router::Route;

/// Document holding the Thing Description.
pub const THING_DOCUMENT: &str = "/thing.jsn";
/// Document served at `/` when the portal is enabled.
pub const PORTAL_DOCUMENT: &str = "/index.htm";

/// A boolean property and the template its GET representation starts from.
#[derive(Debug, Clone)]
pub struct PropertySpec {
    pub name: String,
    pub template: String,
}

impl PropertySpec {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            template: format!("/property/{name}.jsn"),
            name,
        }
    }
}

/// Body of a `POST .../actions` request.
#[derive(Debug, Deserialize)]
struct ActionInvocation {
    name: String,
}

/// Level a JSON value drives a pin to: numbers are high when non-zero, and
/// anything that is neither a boolean nor a number is low.
fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(value) => *value,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        _ => false,
    }
}

fn method_not_allowed(request: &Request<'_>) -> Error {
    Error::MethodNotAllowed(request.method.to_string(), request.path.to_string())
}

/// Everything the handlers act on: documents, device state, actions.
pub struct ThingResources<F, D> {
    store: F,
    device: D,
    codec: JsonCodec,
    actions: ActionRegistry,
    properties: Vec<PropertySpec>,
    portal: bool,
}

impl<F, D> ThingResources<F, D>
where
    F: FileStore,
    D: DeviceState,
{
    pub fn new(store: F, device: D, codec: JsonCodec) -> Self {
        Self {
            store,
            device,
            codec,
            actions: ActionRegistry::default(),
            properties: Vec::new(),
            portal: false,
        }
    }

    pub fn with_properties<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.properties = names.into_iter().map(PropertySpec::new).collect();
        self
    }

    pub fn with_portal(mut self, portal: bool) -> Self {
        self.portal = portal;
        self
    }

    pub fn action_registry(&self) -> &ActionRegistry {
        &self.actions
    }

    pub fn actions_mut(&mut self) -> &mut ActionRegistry {
        &mut self.actions
    }

    pub fn properties(&self) -> &[PropertySpec] {
        &self.properties
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    /// Run the handler for `route`.
    ///
    /// `body` is the connection stream positioned just past the headers.
    /// `Ok(None)` means the connection is closed without any response.
    pub async fn dispatch<B>(
        &mut self,
        route: Route<'_>,
        request: &Request<'_>,
        body: &mut B,
    ) -> Result<Option<Reply<F::Reader>>, Error>
    where
        B: AsyncRead + Unpin,
    {
        match route {
            Route::Root if self.portal => self.portal_page(request).await.map(Some),
            Route::Root | Route::Thing => self.thing(request).await.map(Some),
            Route::Things => self.things(request).await.map(Some),
            Route::Properties(suffix) => self.property(request, suffix, body).await.map(Some),
            Route::Actions(suffix) => self.invoke_action(request, suffix, body).await,
            Route::Events(suffix) => self.events(request, suffix).map(Some),
            Route::NotFound => Err(Error::NotFound(request.path.to_string())),
        }
    }

    async fn open(&self, name: &str) -> Result<F::Reader, Error> {
        self.store
            .open(name)
            .await
            .ok_or_else(|| Error::MissingDocument(name.to_string()))
    }

    async fn portal_page(&self, request: &Request<'_>) -> Result<Reply<F::Reader>, Error> {
        if !request.is(Method::GET) {
            return Err(method_not_allowed(request));
        }
        let page = self.open(PORTAL_DOCUMENT).await?;
        debug!("sending {PORTAL_DOCUMENT}");
        Ok(Reply::new(StatusCode::Ok)
            .with_content_type(ContentType::Html)
            .with_body(Body::Document(page)))
    }

    async fn thing(&self, request: &Request<'_>) -> Result<Reply<F::Reader>, Error> {
        if !request.is(Method::GET) {
            return Err(method_not_allowed(request));
        }
        let description = self.open(THING_DOCUMENT).await?;
        debug!("sending {THING_DOCUMENT}");
        Ok(Reply::new(StatusCode::Ok)
            .with_content_type(ContentType::Json)
            .with_body(Body::Document(description)))
    }

    async fn things(&self, request: &Request<'_>) -> Result<Reply<F::Reader>, Error> {
        if !request.is(Method::GET) {
            return Err(method_not_allowed(request));
        }
        let description = self.open(THING_DOCUMENT).await?;
        debug!("sending {THING_DOCUMENT} as a collection");
        Ok(Reply::new(StatusCode::Ok)
            .with_content_type(ContentType::Json)
            .with_body(Body::Collection(description)))
    }

    async fn property<B>(
        &mut self,
        request: &Request<'_>,
        suffix: &str,
        body: &mut B,
    ) -> Result<Reply<F::Reader>, Error>
    where
        B: AsyncRead + Unpin,
    {
        let Some(property) = suffix
            .strip_prefix('/')
            .and_then(|name| self.properties.iter().find(|p| p.name.eq_ignore_ascii_case(name)))
        else {
            return Err(Error::NotFound(request.path.to_string()));
        };

        if request.is(Method::GET) {
            let mut template = self.open(&property.template).await?;
            let mut document = self.codec.parse_object(&mut template).await?;
            let value = self.device.read_property(&property.name);
            document.insert(property.name.clone(), Value::Bool(value));

            let encoded = self.codec.serialize(&document)?;
            Ok(Reply::new(StatusCode::Ok)
                .with_content_type(ContentType::Json)
                .with_body(Body::Json(encoded)))
        } else if request.is(Method::PUT) {
            let document = self.codec.parse_object(body).await?;
            let Some(value) = document.get(&property.name).map(truthy) else {
                return Err(Error::BadRequest(format!("missing field {}", property.name)));
            };

            self.device.write_property(&property.name, value);
            info!("property {} set to {value}", property.name);
            Ok(Reply::new(StatusCode::Ok))
        } else {
            Err(method_not_allowed(request))
        }
    }

    async fn invoke_action<B>(
        &mut self,
        request: &Request<'_>,
        suffix: &str,
        body: &mut B,
    ) -> Result<Option<Reply<F::Reader>>, Error>
    where
        B: AsyncRead + Unpin,
    {
        if !(suffix.is_empty() || suffix == "/") {
            // Individual action resources have no defined behavior.
            warn!("no handler for action resource {suffix}, closing without a response");
            return Ok(None);
        }

        if request.is(Method::GET) {
            // Listing actions is not implemented.
            return Ok(Some(Reply::new(StatusCode::NoContent)));
        }
        if !request.is(Method::POST) {
            return Err(method_not_allowed(request));
        }

        let document = self.codec.parse_object(body).await?;
        let invocation: ActionInvocation = serde_json::from_value(Value::Object(document))
            .map_err(|e| Error::BadRequest(format!("action request: {e}")))?;

        match self.actions.invoke(&invocation.name, &mut self.device) {
            Some(ActionEffect::Completed) => {
                info!("action {} completed", invocation.name);
                Ok(Some(Reply::new(StatusCode::NoContent)))
            }
            Some(ActionEffect::Restart) => {
                info!("action {} requests a restart", invocation.name);
                Ok(Some(Reply::new(StatusCode::NoContent).then_restart()))
            }
            None => Err(Error::BadRequest(format!("unknown action {}", invocation.name))),
        }
    }

    fn events(&self, request: &Request<'_>, suffix: &str) -> Result<Reply<F::Reader>, Error> {
        if !request.is(Method::GET) {
            return Err(method_not_allowed(request));
        }
        debug!("events requested at {suffix:?}; none are produced");
        Ok(Reply::new(StatusCode::NoContent))
    }
}
