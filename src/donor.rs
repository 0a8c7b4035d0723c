// The character separating fields in the backing file.
// Field values are written raw, with no quoting or escaping.
pub const DELIMITER: char = ',';

// Number of fields in a serialized donor line.
pub const FIELDS: usize = 9;

// Donor is a single person on the roster.
// All fields are free text; blood group and Rh factor are not validated
// against a fixed set.
#[derive(Debug, Default, Clone)]
#[cfg_attr(test, derive(PartialEq))]
pub struct Donor {
    // The lookup key. Not unique; lookups resolve to the first match.
    pub name: String,
    pub email: String,
    pub phone: String,
    pub province: String,
    pub canton: String,
    pub district: String,
    pub address: String,
    pub blood_group: String,
    pub rh_factor: String,
}

// Replacement values for every donor field except the name.
#[derive(Debug, Default)]
#[cfg_attr(test, derive(PartialEq))]
pub struct DonorUpdate {
    pub email: String,
    pub phone: String,
    pub province: String,
    pub canton: String,
    pub district: String,
    pub address: String,
    pub blood_group: String,
    pub rh_factor: String,
}

impl Donor {
    // Parse one line of the backing file.
    // Returns None unless the line splits into exactly 9 fields.
    pub fn from_line(line: &str) -> Option<Donor> {
        let fields: Vec<&str> = line.split(DELIMITER).collect();
        let [name, email, phone, province, canton, district, address, blood_group, rh_factor] =
            fields[..]
        else {
            return None;
        };
        Some(Donor {
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            province: province.into(),
            canton: canton.into(),
            district: district.into(),
            address: address.into(),
            blood_group: blood_group.into(),
            rh_factor: rh_factor.into(),
        })
    }

    // Overwrite every field except the name.
    pub fn apply(&mut self, update: DonorUpdate) {
        self.email = update.email;
        self.phone = update.phone;
        self.province = update.province;
        self.canton = update.canton;
        self.district = update.district;
        self.address = update.address;
        self.blood_group = update.blood_group;
        self.rh_factor = update.rh_factor;
    }

    // The grouping key for blood type counts, e.g. "O +".
    // Unlike name lookup, this key is case-sensitive.
    pub fn blood_type(&self) -> String {
        format!("{} {}", self.blood_group, self.rh_factor)
    }
}

impl std::fmt::Display for Donor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let fields = [
            &self.name,
            &self.email,
            &self.phone,
            &self.province,
            &self.canton,
            &self.district,
            &self.address,
            &self.blood_group,
            &self.rh_factor,
        ];
        let mut fields = fields.iter();
        if let Some(first) = fields.next() {
            write!(f, "{first}")?;
        }
        for field in fields {
            write!(f, "{DELIMITER}{field}")?;
        }
        Ok(())
    }
}
