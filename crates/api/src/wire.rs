/// Renders a reservation state the way it's written on the wire
/// (`ReservationState`'s own `SCREAMING_SNAKE_CASE` serde rename), rather
/// than duplicating that mapping at each call site.
pub fn estado_str(state: store::ReservationState) -> String {
    serde_json::to_value(state)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}
