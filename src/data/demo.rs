use crate::data::{Road, RoadId, RoadNetwork};
use crate::geo::GeoPoint;
use crate::hash::{hash2, unit_noise};

/// Center of the synthetic city
const CENTER: GeoPoint = GeoPoint::new(48.8566, 2.3522);
/// Streets per axis
const STREETS: usize = 48;
/// Block size in degrees of latitude (~170m)
const BLOCK_DEG: f64 = 0.0015;
/// Intermediate vertices per block, jittered so simplification has work to do
const VERTS_PER_BLOCK: usize = 8;

/// Generate a synthetic street grid for when no data file is available:
/// residential grid, secondary and primary arterials, two trunk diagonals
/// and a closed motorway ring.
pub fn generate_demo_city() -> RoadNetwork {
    let lon_block = BLOCK_DEG / CENTER.lat.to_radians().cos();
    let half = STREETS as f64 * 0.5;
    let origin = GeoPoint::new(CENTER.lat - half * BLOCK_DEG, CENTER.lon - half * lon_block);
    let steps = (STREETS - 1) * VERTS_PER_BLOCK;

    let mut roads = Vec::with_capacity(STREETS * 2 + 3);
    let mut next_id: RoadId = 1;

    // Jitter amplitude is a small fraction of a block
    let jitter = |id: RoadId, i: usize| -> f64 {
        (unit_noise(hash2(id as u64, i as u64)) - 0.5) * BLOCK_DEG * 0.04
    };

    for s in 0..STREETS {
        let class = street_class(s);

        // East-west street
        let lat = origin.lat + s as f64 * BLOCK_DEG;
        let id = next_id;
        let points = (0..=steps)
            .map(|i| {
                let t = i as f64 / VERTS_PER_BLOCK as f64;
                GeoPoint::new(lat + jitter(id, i), origin.lon + t * lon_block)
            })
            .collect();
        roads.push(Road::new(id, class, format!("Street {s}"), points));
        next_id += 1;

        // North-south avenue
        let lon = origin.lon + s as f64 * lon_block;
        let id = next_id;
        let points = (0..=steps)
            .map(|i| {
                let t = i as f64 / VERTS_PER_BLOCK as f64;
                GeoPoint::new(
                    origin.lat + t * BLOCK_DEG,
                    lon + jitter(id, i) / CENTER.lat.to_radians().cos(),
                )
            })
            .collect();
        roads.push(Road::new(id, class, format!("Avenue {s}"), points));
        next_id += 1;
    }

    // Diagonal trunks corner to corner
    let span = (STREETS - 1) as f64;
    for (k, (from, to)) in [((0.0, 0.0), (span, span)), ((0.0, span), (span, 0.0))]
        .into_iter()
        .enumerate()
    {
        let id = next_id;
        let points = (0..=steps)
            .map(|i| {
                let t = i as f64 / steps as f64;
                let row = from.0 + (to.0 - from.0) * t;
                let col = from.1 + (to.1 - from.1) * t;
                GeoPoint::new(
                    origin.lat + row * BLOCK_DEG + jitter(id, i),
                    origin.lon + col * lon_block,
                )
            })
            .collect();
        roads.push(Road::new(id, "trunk", format!("Diagonal {k}"), points));
        next_id += 1;
    }

    // Ring motorway around the grid
    let radius = half * BLOCK_DEG * 1.2;
    let ring_steps = 512;
    let mut ring: Vec<GeoPoint> = (0..ring_steps)
        .map(|i| {
            let a = i as f64 / ring_steps as f64 * std::f64::consts::TAU;
            GeoPoint::new(
                CENTER.lat + radius * a.sin(),
                CENTER.lon + radius * a.cos() / CENTER.lat.to_radians().cos(),
            )
        })
        .collect();
    ring.push(ring[0]);
    roads.push(Road::new(next_id, "motorway", "Ring", ring));

    RoadNetwork::new(roads, Some("Demo city".to_string()))
}

fn street_class(index: usize) -> &'static str {
    if index % 12 == 0 {
        "primary"
    } else if index % 6 == 0 {
        "secondary"
    } else if index % 3 == 0 {
        "tertiary"
    } else {
        "residential"
    }
}
