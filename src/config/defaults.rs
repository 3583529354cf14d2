use std::collections::BTreeMap;

pub(super) fn endpoint() -> String {
    String::from("http://localhost:8080/api/token")
}

pub(super) fn login_route() -> String {
    String::from("/login")
}

pub(super) fn timeout() -> u64 {
    10
}

pub(super) fn empty_map() -> BTreeMap<String, String> {
    BTreeMap::new()
}
