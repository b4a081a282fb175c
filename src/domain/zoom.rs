//! Zoom level to circle radius lookup
//!
//! Completely pure: the radius is a total function of the zoom level.
//! Levels outside the curated range fall through to [`DEFAULT_RADIUS_METERS`].

/// Lowest zoom level with a curated radius
pub const MIN_ZOOM: i32 = 3;
/// Highest zoom level with a curated radius
pub const MAX_ZOOM: i32 = 11;
/// Radius for any zoom level without a table entry
pub const DEFAULT_RADIUS_METERS: u32 = 3000;

/// Returns the circle radius in meters for a zoom level
///
/// # Examples
/// ```rust
/// use geomap_sync::domain::zoom::radius_for_zoom;
///
/// assert_eq!(radius_for_zoom(5), 80_000);
/// assert_eq!(radius_for_zoom(12), 3_000);
/// ```
pub fn radius_for_zoom(zoom: i32) -> u32 {
    match zoom {
        3 => 360_000,
        4 => 160_000,
        5 => 80_000,
        6 => 40_000,
        7 => 24_000,
        8 => 12_000,
        9 => 6_000,
        10 => 3_000,
        11 => 2_000,
        _ => DEFAULT_RADIUS_METERS,
    }
}

/// Returns true if the zoom level has a curated table entry
pub fn is_tabulated(zoom: i32) -> bool {
    (MIN_ZOOM..=MAX_ZOOM).contains(&zoom)
}
