//! Bundled localization strings.

/// The English catalog, installed during module init. Hosts with their
/// own translations layer them on top; later entries win.
pub fn english() -> Vec<(String, String)> {
    [
        ("FRIENDPOINTS.Label", "Friend Points"),
        ("FRIENDPOINTS.OperationFailed", "Friend Points: {error}"),
        ("FRIENDPOINTS.MenuRequestReroll", "Request Friend Point Reroll"),
        ("FRIENDPOINTS.NoTargetsTitle", "No Friend Points Available"),
        (
            "FRIENDPOINTS.NoTargetsBody",
            "No connected player has a character with Friend Points to spend.",
        ),
        ("FRIENDPOINTS.ChooseTargetTitle", "Ask for a Friend Point"),
        ("FRIENDPOINTS.TargetOption", "{actor} ({owner}), {value} left"),
        ("FRIENDPOINTS.RequestTitle", "Friend Point Request"),
        (
            "FRIENDPOINTS.RequestBody",
            "{requester} asks to spend one of {target}'s Friend Points to reroll a die. Allow it?",
        ),
        ("FRIENDPOINTS.Accept", "Spend the point"),
        ("FRIENDPOINTS.Decline", "Refuse"),
        (
            "FRIENDPOINTS.RequestAccepted",
            "{owner} spent a Friend Point. The die was rerolled.",
        ),
        (
            "FRIENDPOINTS.RequestDeclined",
            "{owner} declined to spend a Friend Point.",
        ),
        (
            "FRIENDPOINTS.RequestFailed",
            "Could not reach {owner}. The request was not granted.",
        ),
        ("FRIENDPOINTS.RerollFlavorPrefix", "(Rerolled with Friend Point)"),
        ("FRIENDPOINTS.SettingMaxPointsName", "Maximum Friend Points"),
        (
            "FRIENDPOINTS.SettingMaxPointsHint",
            "How many Friend Points a character can hold.",
        ),
        (
            "FRIENDPOINTS.SettingRequestTimeoutName",
            "Request timeout (seconds)",
        ),
        (
            "FRIENDPOINTS.SettingRequestTimeoutHint",
            "How long a reroll request waits for the other player's answer.",
        ),
    ]
    .into_iter()
    .map(|(key, text)| (key.to_string(), text.to_string()))
    .collect()
}
