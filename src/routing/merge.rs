use serde_json::{json, Value};

/// The configuration every route table starts from before partial
/// configurations are layered on top.
pub fn default_route_configuration() -> Value {
    json!({
        "default": "home",
        "routes": {
            "GET": {},
            "POST": {},
            "PUT": {},
            "DELETE": {},
        },
        "not_found": "404",
    })
}

/// Deep-merges `overlay` into `base`.
///
/// Keys whose values are objects on both sides are merged recursively, any
/// other value from `overlay` replaces the one in `base`. A replaced key keeps
/// its original position.
pub fn merge_configuration(base: &mut Value, overlay: &Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                match base_map.get_mut(key) {
                    Some(base_value) if base_value.is_object() && overlay_value.is_object() => {
                        merge_configuration(base_value, overlay_value);
                    }
                    Some(base_value) => *base_value = overlay_value.clone(),
                    None => {
                        base_map.insert(key.clone(), overlay_value.clone());
                    }
                }
            }
        }
        (base, overlay) => *base = overlay.clone(),
    }
}

/// Layers each partial configuration, in order, over the default one.
pub fn merge_configurations<'a>(partials: impl IntoIterator<Item = &'a Value>) -> Value {
    let mut merged = default_route_configuration();
    for partial in partials {
        merge_configuration(&mut merged, partial);
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_partials_gives_default() {
        assert_eq!(
            merge_configurations(std::iter::empty::<&Value>()),
            default_route_configuration()
        );
    }

    #[test]
    fn later_scalars_win() {
        let merged = merge_configurations([
            &json!({"default": "index"}),
            &json!({"default": "start", "not_found": "missing"}),
        ]);
        assert_eq!(merged["default"], "start");
        assert_eq!(merged["not_found"], "missing");
    }

    #[test]
    fn nested_maps_are_merged() {
        let merged = merge_configurations([
            &json!({"routes": {"GET": {"/a": "a", "/b": "b"}}}),
            &json!({"routes": {"GET": {"/b": "b2", "/c": "c"}, "POST": {"/a": "post_a"}}}),
        ]);

        let get = merged["routes"]["GET"].as_object().unwrap();
        let keys: Vec<&str> = get.keys().map(String::as_str).collect();
        assert_eq!(keys, ["/a", "/b", "/c"]);
        assert_eq!(get["/b"], "b2");
        assert_eq!(merged["routes"]["POST"]["/a"], "post_a");
        assert_eq!(merged["routes"]["PUT"], json!({}));
    }

    #[test]
    fn non_map_replaces_map() {
        let mut base = json!({"routes": {"GET": {"/a": "a"}}});
        merge_configuration(&mut base, &json!({"routes": {"GET": "nope"}}));
        assert_eq!(base["routes"]["GET"], "nope");
    }
}
