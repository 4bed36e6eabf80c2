use crate::foundation::error::{DtiError, DtiResult};
use crate::pose::{BitField, PetPose};

/// Species/color validity table.
///
/// Wire format: `[species_count, color_count, masks...]` where `masks` is a row-major
/// `species_count x color_count` matrix of [`BitField`] bytes. Species and color ids are 1-based.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidityTable {
    species_count: u8,
    color_count: u8,
    masks: Vec<u8>,
}

impl ValidityTable {
    /// Decode the table served by the `validPetPoses` endpoint.
    ///
    /// Fails with [`DtiError::CorruptTable`] when the byte length is not `2 + S*C`.
    pub fn decode(bytes: &[u8]) -> DtiResult<Self> {
        let [species_count, color_count, masks @ ..] = bytes else {
            return Err(DtiError::corrupt_table(format!(
                "table is {} bytes, shorter than its 2-byte header",
                bytes.len()
            )));
        };

        let expected = usize::from(*species_count) * usize::from(*color_count);
        if masks.len() != expected {
            return Err(DtiError::corrupt_table(format!(
                "header declares {species_count} species x {color_count} colors = {expected} masks, found {}",
                masks.len()
            )));
        }

        Ok(Self {
            species_count: *species_count,
            color_count: *color_count,
            masks: masks.to_vec(),
        })
    }

    /// Build a table from a row-major mask matrix.
    pub fn from_masks(species_count: u8, color_count: u8, masks: Vec<u8>) -> DtiResult<Self> {
        let expected = usize::from(species_count) * usize::from(color_count);
        if masks.len() != expected {
            return Err(DtiError::invalid_argument(format!(
                "expected {expected} masks for {species_count}x{color_count}, got {}",
                masks.len()
            )));
        }
        Ok(Self {
            species_count,
            color_count,
            masks,
        })
    }

    /// Encode back into the wire format accepted by [`ValidityTable::decode`].
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(2 + self.masks.len());
        out.push(self.species_count);
        out.push(self.color_count);
        out.extend_from_slice(&self.masks);
        out
    }

    /// Number of species rows.
    pub fn species_count(&self) -> u8 {
        self.species_count
    }

    /// Number of color columns.
    pub fn color_count(&self) -> u8 {
        self.color_count
    }

    /// Pose mask for a species/color pair.
    pub fn get_mask(&self, species_id: u32, color_id: u32) -> DtiResult<BitField> {
        let offset = self.offset(species_id, color_id)?;
        Ok(BitField::new(self.masks[offset]))
    }

    /// Whether the pair exists at all (`pose == None`) or has the given pose.
    pub fn is_valid(
        &self,
        species_id: u32,
        color_id: u32,
        pose: Option<PetPose>,
    ) -> DtiResult<bool> {
        let mask = self.get_mask(species_id, color_id)?;
        Ok(match pose {
            None => !mask.is_empty(),
            Some(pose) => mask.check(pose),
        })
    }

    /// Color ids whose pairing with `species_id` has validity equal to `valid`.
    pub fn colors_for_species(&self, species_id: u32, valid: bool) -> DtiResult<Vec<u32>> {
        (1..=u32::from(self.color_count))
            .filter_map(|color_id| match self.is_valid(species_id, color_id, None) {
                Ok(v) if v == valid => Some(Ok(color_id)),
                Ok(_) => None,
                Err(e) => Some(Err(e)),
            })
            .collect()
    }

    /// Species ids whose pairing with `color_id` has validity equal to `valid`.
    pub fn species_for_color(&self, color_id: u32, valid: bool) -> DtiResult<Vec<u32>> {
        (1..=u32::from(self.species_count))
            .filter_map(|species_id| match self.is_valid(species_id, color_id, None) {
                Ok(v) if v == valid => Some(Ok(species_id)),
                Ok(_) => None,
                Err(e) => Some(Err(e)),
            })
            .collect()
    }

    fn offset(&self, species_id: u32, color_id: u32) -> DtiResult<usize> {
        if species_id == 0 || species_id > u32::from(self.species_count) {
            return Err(DtiError::invalid_argument(format!(
                "species id {species_id} outside 1..={}",
                self.species_count
            )));
        }
        if color_id == 0 || color_id > u32::from(self.color_count) {
            return Err(DtiError::invalid_argument(format!(
                "color id {color_id} outside 1..={}",
                self.color_count
            )));
        }
        let row = (species_id - 1) as usize;
        let col = (color_id - 1) as usize;
        Ok(row * usize::from(self.color_count) + col)
    }
}

#[cfg(test)]
#[path = "../tests/unit/validity.rs"]
mod tests;
