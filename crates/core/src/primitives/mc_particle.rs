//! Monte Carlo truth particles

use crate::collection::RecordCollection;
use crate::record::{
    get_f32x3, get_f64x3, put_f32, put_f32x3, put_f64, put_f64x3, put_i32, put_u32, Record,
};
use byteorder::{LittleEndian, ReadBytesExt};
use std::io;

/// A generated or simulated particle.
///
/// ```text
/// offset  size  field
///      0     4  pdg         (i32)
///      4     4  gen_status  (i32)
///      8     4  sim_status  (u32)
///     12     4  charge      (f32)
///     16     4  time        (f32, ns)
///     20     8  mass        (f64, GeV)
///     28    24  vertex      (3 x f64, mm)
///     52    12  momentum    (3 x f32, GeV)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct McParticle {
    /// PDG particle code
    pub pdg: i32,
    /// Generator status
    pub gen_status: i32,
    /// Simulation status bit field
    pub sim_status: u32,
    /// Electric charge
    pub charge: f32,
    /// Creation time
    pub time: f32,
    /// Rest mass
    pub mass: f64,
    /// Production vertex
    pub vertex: [f64; 3],
    /// Momentum at the production vertex
    pub momentum: [f32; 3],
}

impl Record for McParticle {
    const TYPE_TAG: &'static str = "eicio.MCParticle";
    const ENCODED_SIZE: usize = 64;

    fn encode_into(&self, buf: &mut Vec<u8>) {
        put_i32(buf, self.pdg);
        put_i32(buf, self.gen_status);
        put_u32(buf, self.sim_status);
        put_f32(buf, self.charge);
        put_f32(buf, self.time);
        put_f64(buf, self.mass);
        put_f64x3(buf, self.vertex);
        put_f32x3(buf, self.momentum);
    }

    fn decode_from(reader: &mut &[u8]) -> io::Result<Self> {
        Ok(McParticle {
            pdg: reader.read_i32::<LittleEndian>()?,
            gen_status: reader.read_i32::<LittleEndian>()?,
            sim_status: reader.read_u32::<LittleEndian>()?,
            charge: reader.read_f32::<LittleEndian>()?,
            time: reader.read_f32::<LittleEndian>()?,
            mass: reader.read_f64::<LittleEndian>()?,
            vertex: get_f64x3(reader)?,
            momentum: get_f32x3(reader)?,
        })
    }
}

/// Collection of [`McParticle`] records
pub type McParticleCollection = RecordCollection<McParticle>;
