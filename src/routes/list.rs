//! Operations on the server's ordered route sequence.

use serde_json::Value;

use crate::routes::build::ID_FIELD;

/// Identifier of a route object, if it carries one.
pub fn route_id(route: &Value) -> Option<&str> {
    route.get(ID_FIELD)?.as_str()
}

/// Position of the route with the given identifier.
pub fn find_route_index(routes: &[Value], id: &str) -> Option<usize> {
    routes.iter().position(|route| route_id(route) == Some(id))
}

/// Outcome of an upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    /// An entry with the same identifier was replaced at this position.
    Replaced(usize),
    /// No entry carried the identifier; the route was appended.
    Appended,
}

/// Insert a route, replacing any existing route with the same identifier
/// at its current position so the ordering of unrelated routes (and with
/// it host-matching precedence) is preserved.
pub fn upsert_route(routes: &mut Vec<Value>, route: Value) -> Upsert {
    match route_id(&route).and_then(|id| find_route_index(routes, id)) {
        Some(index) => {
            routes[index] = route;
            Upsert::Replaced(index)
        }
        None => {
            routes.push(route);
            Upsert::Appended
        }
    }
}

/// Remove the route with the given identifier, shifting later routes down.
/// Returns `false` (list untouched) when no route carries it.
pub fn remove_route(routes: &mut Vec<Value>, id: &str) -> bool {
    match find_route_index(routes, id) {
        Some(index) => {
            routes.remove(index);
            true
        }
        None => false,
    }
}
