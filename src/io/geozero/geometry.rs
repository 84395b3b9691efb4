use geo::Coord;
use geozero::{GeomProcessor, GeozeroGeometry};

use crate::geometry::Geometry;

fn process_coords<P: GeomProcessor>(
    coords: &[Coord],
    tagged: bool,
    idx: usize,
    processor: &mut P,
) -> geozero::error::Result<()> {
    processor.linestring_begin(tagged, coords.len(), idx)?;
    for (coord_idx, coord) in coords.iter().enumerate() {
        processor.xy(coord.x, coord.y, coord_idx)?;
    }
    processor.linestring_end(tagged, idx)?;
    Ok(())
}

pub(crate) fn process_geometry<P: GeomProcessor>(
    geom: &Geometry,
    geom_idx: usize,
    processor: &mut P,
) -> geozero::error::Result<()> {
    match geom {
        Geometry::Point(coord) => {
            processor.point_begin(geom_idx)?;
            processor.xy(coord.x, coord.y, 0)?;
            processor.point_end(geom_idx)?;
        }
        Geometry::LineString(coords) => process_coords(coords, true, geom_idx, processor)?,
        Geometry::Polygon(rings) => {
            processor.polygon_begin(true, rings.len(), geom_idx)?;
            for (ring_idx, ring) in rings.iter().enumerate() {
                process_coords(ring, false, ring_idx, processor)?;
            }
            processor.polygon_end(true, geom_idx)?;
        }
    }
    Ok(())
}

impl GeozeroGeometry for Geometry {
    fn process_geom<P: GeomProcessor>(&self, processor: &mut P) -> geozero::error::Result<()>
    where
        Self: Sized,
    {
        process_geometry(self, 0, processor)
    }
}
