//! Static lookup tables mapping Tomorrow.io weather codes to Spanish
//! descriptions and icon glyphs. Unknown codes fall back to a placeholder.

pub fn describe(code: i32) -> &'static str {
    match code {
        1000 => "Soleado",
        1001 => "Nublado",
        1100 => "Mayormente soleado",
        1101 => "Parcialmente nublado",
        1102 => "Mayormente nublado",
        2000 => "Niebla",
        4000 => "Llovizna",
        4001 => "Lluvia",
        4200 => "Lluvia ligera",
        4201 => "Lluvia fuerte",
        _ => "Desconocido",
    }
}

pub fn icon(code: i32) -> &'static str {
    match code {
        1000 => "☀️",
        1001 => "☁️",
        1100 => "🌤️",
        1101 => "⛅",
        1102 => "🌥️",
        2000 => "🌫️",
        4000 => "🌧️",
        4001 => "🌧️",
        4200 => "🌦️",
        4201 => "🌧️",
        _ => "❓",
    }
}
