use std::f64::consts::PI;

use crate::model::Coordinate;

pub const DEFAULT_ZOOM: u8 = 11;

/// Deepest zoom the OSM tile server renders.
pub const MAX_ZOOM: u8 = 19;

const TILE_URL: &str = "https://tile.openstreetmap.org";
const MAX_MERCATOR_LATITUDE: f64 = 85.0511;

/// Address of one raster basemap tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileId {
    pub zoom: u8,
    pub x: u32,
    pub y: u32,
}

impl TileId {
    /// The Web-Mercator tile that contains `coordinate` at `zoom`, capped at [`MAX_ZOOM`].
    pub fn containing(coordinate: Coordinate, zoom: u8) -> Self {
        let zoom = zoom.min(MAX_ZOOM);
        let n = 2f64.powi(i32::from(zoom));
        let lat = coordinate.latitude().clamp(-MAX_MERCATOR_LATITUDE, MAX_MERCATOR_LATITUDE);
        let lat_rad = lat.to_radians();

        let x = (coordinate.longitude() + 180.0) / 360.0 * n;
        let y = (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0 * n;

        let last = n - 1.0;
        Self { zoom, x: x.floor().clamp(0.0, last) as u32, y: y.floor().clamp(0.0, last) as u32 }
    }

    pub fn tile_url(&self) -> String {
        format!("{TILE_URL}/{}/{}/{}.png", self.zoom, self.x, self.y)
    }
}

/// Browser link centred on the coordinate.
pub fn map_link(coordinate: Coordinate, zoom: u8) -> String {
    format!(
        "https://www.openstreetmap.org/?mlat={lat:.4}&mlon={lon:.4}#map={zoom}/{lat:.4}/{lon:.4}",
        lat = coordinate.latitude(),
        lon = coordinate.longitude(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_tile_at_zoom_zero() {
        let tile = TileId::containing(Coordinate::new(0.0, 0.0).unwrap(), 0);
        assert_eq!(tile, TileId { zoom: 0, x: 0, y: 0 });
    }

    #[test]
    fn ho_chi_minh_city_tile() {
        let tile = TileId::containing(Coordinate::new(10.76, 106.66).unwrap(), DEFAULT_ZOOM);
        assert_eq!((tile.x, tile.y), (1630, 962));
        assert_eq!(tile.tile_url(), "https://tile.openstreetmap.org/11/1630/962.png");
    }

    #[test]
    fn edges_stay_inside_tile_grid() {
        let tile = TileId::containing(Coordinate::new(90.0, 180.0).unwrap(), 2);
        assert_eq!((tile.x, tile.y), (3, 0));
        let tile = TileId::containing(Coordinate::new(-90.0, -180.0).unwrap(), 2);
        assert_eq!((tile.x, tile.y), (0, 3));
    }

    #[test]
    fn zoom_is_capped() {
        let tile = TileId::containing(Coordinate::new(10.76, 106.66).unwrap(), 40);
        assert_eq!(tile.zoom, MAX_ZOOM);
        assert!(tile.x < (1 << MAX_ZOOM) && tile.y < (1 << MAX_ZOOM));
        assert_eq!(tile, TileId::containing(Coordinate::new(10.76, 106.66).unwrap(), MAX_ZOOM));
    }

    #[test]
    fn link_uses_four_decimals() {
        let link = map_link(Coordinate::new(21.0285, 105.8542).unwrap(), 11);
        assert!(link.contains("mlat=21.0285&mlon=105.8542"));
        assert!(link.ends_with("#map=11/21.0285/105.8542"));
    }
}
