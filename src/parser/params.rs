//! Parameter section handling
//!
//! Parameters are kept as text rather than numbers: OSC and DCS payloads
//! are not numeric, and an omitted field must stay distinguishable from an
//! explicit `0`.

/// Value standing in for an omitted parameter (`;;`, or a leading or
/// trailing separator)
pub const OMITTED: &str = "-1";

/// Whether `c` can appear in a CSI parameter section (0x30-0x3F)
pub fn is_param_byte(c: char) -> bool {
    ('\x30'..='\x3f').contains(&c)
}

/// Split CSI data into its parameter section and trailing intermediates
pub fn split_csi(data: &str) -> (&str, &str) {
    let end = data
        .char_indices()
        .find(|&(_, c)| !is_param_byte(c))
        .map_or(data.len(), |(offset, _)| offset);
    data.split_at(end)
}

/// Split a parameter section on `;` and `:`
///
/// An empty section has no parameters; otherwise there is one entry per
/// field and empty fields become [`OMITTED`].
pub fn split_params(section: &str) -> Vec<String> {
    if section.is_empty() {
        return Vec::new();
    }
    section
        .split([';', ':'])
        .map(|field| {
            if field.is_empty() {
                OMITTED.to_string()
            } else {
                field.to_string()
            }
        })
        .collect()
}

/// Insert the missing colorspace id into 5-field truecolor SGR parameters
///
/// `38;2;R;G;B` becomes `38;2;0;R;G;B` (likewise for 48), matching the
/// 6-field form with an explicit colorspace.
pub fn normalize_sgr(params: &mut Vec<String>) {
    let truecolor = params.len() == 5
        && matches!(params[0].as_str(), "38" | "48")
        && params[1] == "2";
    if truecolor {
        params.insert(2, "0".to_string());
    }
}
