//! Path routing.

/// The resource a request path resolves to.
///
/// Sub-resource variants carry the remainder of the path after their prefix,
/// e.g. `/on` for `/things/wot/properties/on`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route<'a> {
    Root,
    Things,
    Thing,
    Properties(&'a str),
    Actions(&'a str),
    Events(&'a str),
    NotFound,
}

/// Maps request paths onto the resources of a single named Thing.
///
/// Matching ignores ASCII case. Exact matches on `/`, `/things` and
/// `/things/<name>` win over the sub-resource prefixes.
#[derive(Debug, Clone)]
pub struct Router {
    thing: String,
    properties: String,
    actions: String,
    events: String,
}

impl Router {
    pub fn new(thing_name: &str) -> Self {
        let thing = format!("/things/{thing_name}");
        Self {
            properties: format!("{thing}/properties"),
            actions: format!("{thing}/actions"),
            events: format!("{thing}/events"),
            thing,
        }
    }

    /// The path of the Thing resource, e.g. `/things/wot`.
    pub fn thing_path(&self) -> &str {
        &self.thing
    }

    pub fn route<'a>(&self, path: &'a str) -> Route<'a> {
        if path == "/" {
            Route::Root
        } else if path.eq_ignore_ascii_case("/things") {
            Route::Things
        } else if path.eq_ignore_ascii_case(&self.thing) {
            Route::Thing
        } else if let Some(rest) = strip_prefix_ignore_case(path, &self.properties) {
            Route::Properties(rest)
        } else if let Some(rest) = strip_prefix_ignore_case(path, &self.actions) {
            Route::Actions(rest)
        } else if let Some(rest) = strip_prefix_ignore_case(path, &self.events) {
            Route::Events(rest)
        } else {
            Route::NotFound
        }
    }

    /// Every path pattern this router answers, for display.
    pub fn endpoints(&self) -> [String; 6] {
        [
            "/".to_string(),
            "/things".to_string(),
            self.thing.clone(),
            format!("{}[/...]", self.properties),
            format!("{}[/...]", self.actions),
            format!("{}[/...]", self.events),
        ]
    }
}

fn strip_prefix_ignore_case<'a>(path: &'a str, prefix: &str) -> Option<&'a str> {
    let head = path.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &path[prefix.len()..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_routes() {
        let router = Router::new("wot");
        assert_eq!(router.route("/"), Route::Root);
        assert_eq!(router.route("/things"), Route::Things);
        assert_eq!(router.route("/things/wot"), Route::Thing);
    }

    #[test]
    fn test_prefix_routes_carry_suffix() {
        let router = Router::new("wot");
        assert_eq!(router.route("/things/wot/properties/on"), Route::Properties("/on"));
        assert_eq!(router.route("/things/wot/properties"), Route::Properties(""));
        assert_eq!(router.route("/things/wot/actions"), Route::Actions(""));
        assert_eq!(router.route("/things/wot/actions/"), Route::Actions("/"));
        assert_eq!(router.route("/things/wot/events/overheat"), Route::Events("/overheat"));
    }

    #[test]
    fn test_matching_ignores_case() {
        let router = Router::new("wot");
        assert_eq!(router.route("/THINGS"), Route::Things);
        assert_eq!(router.route("/Things/WoT"), Route::Thing);
        assert_eq!(router.route("/things/WOT/Properties/ON"), Route::Properties("/ON"));
    }

    #[test]
    fn test_unknown_paths() {
        let router = Router::new("wot");
        assert_eq!(router.route("/unknown/path"), Route::NotFound);
        assert_eq!(router.route("/things/other"), Route::NotFound);
        assert_eq!(router.route("/things/wo"), Route::NotFound);
        assert_eq!(router.route("/things/"), Route::NotFound);
        assert_eq!(router.route(""), Route::NotFound);
    }

    #[test]
    fn test_non_ascii_path_does_not_panic() {
        let router = Router::new("wot");
        assert_eq!(router.route("/things/wot/propertiés"), Route::NotFound);
        assert_eq!(router.route("/ééééééééééé"), Route::NotFound);
    }

    #[test]
    fn test_thing_name_is_configurable() {
        let router = Router::new("lamp");
        assert_eq!(router.thing_path(), "/things/lamp");
        assert_eq!(router.route("/things/lamp/actions"), Route::Actions(""));
        assert_eq!(router.route("/things/wot"), Route::NotFound);
    }
}
