//! The [fvar (font variations)](https://docs.microsoft.com/en-us/typography/opentype/spec/fvar) table

use types::{Fixed, NameId, ReadScalar, Tag};

use crate::array::ScalarArray;
use crate::read::{ReadError, TableRead};
use crate::table_data::TableData;

/// The length of one variation axis record, in bytes.
const AXIS_RECORD_LEN: usize = 20;

/// The font variations table: design axes and named instances.
#[derive(Clone)]
pub struct Fvar<'a> {
    data: TableData<'a>,
    axes_offset: u16,
    axis_count: u16,
    instance_count: u16,
    instance_size: u16,
}

impl<'a> TableRead<'a> for Fvar<'a> {
    fn read(data: TableData<'a>) -> Result<Self, ReadError> {
        if data.is_empty() {
            return Err(ReadError::BlankTable);
        }
        let mut cursor = data.cursor();
        let major_version: u16 = cursor.read()?;
        if major_version != 1 {
            return Err(ReadError::InvalidFormat(major_version as i64));
        }
        cursor.advance::<u16>(); // minor version
        let axes_offset: u16 = cursor.read()?;
        cursor.advance::<u16>(); // reserved
        let axis_count: u16 = cursor.read()?;
        if axis_count == 0 {
            return Err(ReadError::MalformedData("variable font with no axes"));
        }
        let axis_size: u16 = cursor.read()?;
        if axis_size as usize != AXIS_RECORD_LEN {
            return Err(ReadError::MalformedData("unexpected axis record size"));
        }
        let instance_count: u16 = cursor.read()?;
        let instance_size: u16 = cursor.read()?;
        // Instances may or may not carry a postScriptNameID.
        let coords_len = axis_count as usize * Fixed::RAW_BYTE_LEN;
        if instance_size as usize != coords_len + 4 && instance_size as usize != coords_len + 6 {
            return Err(ReadError::MalformedData("unexpected instance record size"));
        }
        let arrays_len = axis_count as usize * AXIS_RECORD_LEN
            + instance_count as usize * instance_size as usize;
        data.check_in_bounds(axes_offset as usize + arrays_len)?;
        Ok(Fvar {
            data,
            axes_offset,
            axis_count,
            instance_count,
            instance_size,
        })
    }
}

impl<'a> Fvar<'a> {
    /// The number of design axes.
    pub fn axis_count(&self) -> u16 {
        self.axis_count
    }

    /// The number of named instances.
    pub fn instance_count(&self) -> u16 {
        self.instance_count
    }

    /// The variation axis record at `index`.
    pub fn axis(&self, index: usize) -> Option<VariationAxisRecord> {
        if index >= self.axis_count as usize {
            return None;
        }
        let pos = self.axes_offset as usize + index * AXIS_RECORD_LEN;
        Some(VariationAxisRecord {
            axis_tag: self.data.read_at(pos).ok()?,
            min_value: self.data.read_at(pos + 4).ok()?,
            default_value: self.data.read_at(pos + 8).ok()?,
            max_value: self.data.read_at(pos + 12).ok()?,
            flags: self.data.read_at(pos + 16).ok()?,
            axis_name_id: self.data.read_at(pos + 18).ok()?,
        })
    }

    /// Iterate the variation axis records in axis order.
    pub fn axes(&self) -> impl Iterator<Item = VariationAxisRecord> + 'a {
        let copy = self.clone();
        (0..self.axis_count as usize).filter_map(move |i| copy.axis(i))
    }

    /// The named instance record at `index`.
    pub fn instance(&self, index: usize) -> Option<InstanceRecord<'a>> {
        if index >= self.instance_count as usize {
            return None;
        }
        let coords_len = self.axis_count as usize * Fixed::RAW_BYTE_LEN;
        let pos = self.axes_offset as usize
            + self.axis_count as usize * AXIS_RECORD_LEN
            + index * self.instance_size as usize;
        let coordinates = self.data.read_array(pos + 4..pos + 4 + coords_len).ok()?;
        let post_script_name_id = (self.instance_size as usize == coords_len + 6)
            .then(|| self.data.read_at(pos + 4 + coords_len).ok())
            .flatten();
        Some(InstanceRecord {
            subfamily_name_id: self.data.read_at(pos).ok()?,
            flags: self.data.read_at(pos + 2).ok()?,
            coordinates,
            post_script_name_id,
        })
    }

    /// Iterate the named instance records in table order.
    pub fn instances(&self) -> impl Iterator<Item = InstanceRecord<'a>> + 'a {
        let copy = self.clone();
        (0..self.instance_count as usize).filter_map(move |i| copy.instance(i))
    }
}

/// One design axis: its tag, value range and presentation name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VariationAxisRecord {
    /// The tag identifying the axis, `wght` for example.
    pub axis_tag: Tag,
    /// The lowest user coordinate on the axis.
    pub min_value: Fixed,
    /// The default user coordinate on the axis.
    pub default_value: Fixed,
    /// The highest user coordinate on the axis.
    pub max_value: Fixed,
    /// Axis qualifier flags; bit 0 hides the axis from users.
    pub flags: u16,
    /// The name table entry naming the axis.
    pub axis_name_id: NameId,
}

impl VariationAxisRecord {
    /// Returns a normalized coordinate for the given value.
    pub fn normalize(&self, mut value: Fixed) -> Fixed {
        use std::cmp::Ordering::*;
        let min_value = self.min_value;
        let default_value = self.default_value;
        // Make sure max is >= min to avoid potential panic in clamp.
        let max_value = self.max_value.max(min_value);
        value = value.clamp(min_value, max_value);
        value = match value.cmp(&default_value) {
            Less => {
                -((default_value.saturating_sub(value)) / (default_value.saturating_sub(min_value)))
            }
            Greater => {
                (value.saturating_sub(default_value)) / (max_value.saturating_sub(default_value))
            }
            Equal => Fixed::ZERO,
        };
        value.clamp(-Fixed::ONE, Fixed::ONE)
    }
}

/// One named instance: a point in the design space with a name.
#[derive(Clone)]
pub struct InstanceRecord<'a> {
    /// The name table entry naming the instance.
    pub subfamily_name_id: NameId,
    /// Reserved instance flags.
    pub flags: u16,
    /// The instance coordinates, one per axis in axis order.
    pub coordinates: ScalarArray<'a, Fixed>,
    /// An optional name table entry holding the PostScript name.
    pub post_script_name_id: Option<NameId>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use ot_test_data::fvar as test_data;

    fn parse(bytes: &[u8]) -> Fvar {
        Fvar::read(TableData::new(bytes)).unwrap()
    }

    #[test]
    fn axes() {
        let buf = test_data::wght();
        let fvar = parse(&buf);
        assert_eq!(fvar.axis_count(), 1);
        let wght = fvar.axis(0).unwrap();
        assert_eq!(wght.axis_tag, Tag::new(b"wght"));
        assert_eq!(wght.min_value, Fixed::from_f64(100.0));
        assert_eq!(wght.default_value, Fixed::from_f64(400.0));
        assert_eq!(wght.max_value, Fixed::from_f64(900.0));
        assert_eq!(wght.flags, 0);
        assert_eq!(wght.axis_name_id, NameId::new(257));
    }

    #[test]
    fn instances() {
        let buf = test_data::wght();
        let fvar = parse(&buf);
        assert_eq!(fvar.instance_count(), 9);
        // There are 9 instances equally spaced from 100.0 to 900.0
        // with name id monotonically increasing starting at 258.
        for (i, instance) in fvar.instances().enumerate() {
            let value = 100.0 * (i + 1) as f64;
            assert_eq!(instance.coordinates.len(), 1);
            assert_eq!(instance.coordinates.get(0), Some(Fixed::from_f64(value)));
            assert_eq!(instance.subfamily_name_id, NameId::new(258 + i as u16));
            assert_eq!(instance.post_script_name_id, None);
        }
    }

    #[test]
    fn normalize() {
        let buf = test_data::wght();
        let fvar = parse(&buf);
        let axis = fvar.axis(0).unwrap();
        let values = [100.0, 220.0, 250.0, 400.0, 650.0, 900.0];
        let expected = [-1.0, -0.60001, -0.5, 0.0, 0.5, 1.0];
        for (value, expected) in values.into_iter().zip(expected) {
            assert_eq!(
                axis.normalize(Fixed::from_f64(value)),
                Fixed::from_f64(expected)
            );
        }
    }

    #[test]
    fn no_axes_is_malformed() {
        let buf = test_data::no_axes();
        assert!(matches!(
            Fvar::read(TableData::new(&buf)),
            Err(ReadError::MalformedData(_))
        ));
    }

    #[test]
    fn blank_table() {
        assert!(matches!(
            Fvar::read(TableData::new(&[])),
            Err(ReadError::BlankTable)
        ));
    }
}
