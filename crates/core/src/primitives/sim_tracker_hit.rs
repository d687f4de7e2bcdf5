//! Simulated tracker hits

use crate::collection::RecordCollection;
use crate::record::{
    get_f32x3, get_f64x3, put_f32, put_f32x3, put_f64x3, put_i32, put_u64, Record,
};
use byteorder::{LittleEndian, ReadBytesExt};
use std::io;

/// An energy deposit in a tracking detector cell.
///
/// ```text
/// offset  size  field
///      0     8  cell_id      (u64)
///      8     4  edep         (f32, GeV)
///     12     4  time         (f32, ns)
///     16     4  path_length  (f32, mm)
///     20     4  quality      (i32)
///     24    24  position     (3 x f64, mm)
///     48    12  momentum     (3 x f32, GeV)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SimTrackerHit {
    /// Detector cell identifier
    pub cell_id: u64,
    /// Deposited energy
    pub edep: f32,
    /// Hit time
    pub time: f32,
    /// Path length of the particle in the sensor
    pub path_length: f32,
    /// Quality bit flag
    pub quality: i32,
    /// Hit position
    pub position: [f64; 3],
    /// Particle momentum at the hit
    pub momentum: [f32; 3],
}

impl Record for SimTrackerHit {
    const TYPE_TAG: &'static str = "eicio.SimTrackerHit";
    const ENCODED_SIZE: usize = 60;

    fn encode_into(&self, buf: &mut Vec<u8>) {
        put_u64(buf, self.cell_id);
        put_f32(buf, self.edep);
        put_f32(buf, self.time);
        put_f32(buf, self.path_length);
        put_i32(buf, self.quality);
        put_f64x3(buf, self.position);
        put_f32x3(buf, self.momentum);
    }

    fn decode_from(reader: &mut &[u8]) -> io::Result<Self> {
        Ok(SimTrackerHit {
            cell_id: reader.read_u64::<LittleEndian>()?,
            edep: reader.read_f32::<LittleEndian>()?,
            time: reader.read_f32::<LittleEndian>()?,
            path_length: reader.read_f32::<LittleEndian>()?,
            quality: reader.read_i32::<LittleEndian>()?,
            position: get_f64x3(reader)?,
            momentum: get_f32x3(reader)?,
        })
    }
}

/// Collection of [`SimTrackerHit`] records
pub type SimTrackerHitCollection = RecordCollection<SimTrackerHit>;
