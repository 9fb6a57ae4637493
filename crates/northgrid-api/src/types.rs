// Wire types for the `/customers` resource.
//
// Every string field tolerates `null` or absence on read and is always
// written back, so updates are full-record replaces.

use serde::{Deserialize, Deserializer, Serialize};

/// A customer as exchanged with the API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRecord {
    #[serde(rename = "customerID", default, deserialize_with = "nullable_string")]
    pub customer_id: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub company_name: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub contact_name: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub contact_title: String,
    #[serde(default, deserialize_with = "nullable_address")]
    pub address: Address,
}

/// Embedded postal address. Only `city` and `country` are edited by the form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default, deserialize_with = "nullable_string")]
    pub street: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub city: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub region: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub postal_code: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub country: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub phone: String,
}

impl Address {
    /// Address with only the form-editable fields set.
    pub fn city_country(city: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            country: country.into(),
            ..Self::default()
        }
    }
}

fn nullable_string<'de, D>(de: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(de)?.unwrap_or_default())
}

fn nullable_address<'de, D>(de: D) -> Result<Address, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Address>::deserialize(de)?.unwrap_or_default())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn serializes_northwind_shape() {
        let record = CustomerRecord {
            customer_id: "ALFKI".into(),
            company_name: "Alfreds".into(),
            contact_name: "Maria Anders".into(),
            contact_title: "Sales Rep".into(),
            address: Address::city_country("Berlin", "Germany"),
        };

        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({
                "customerID": "ALFKI",
                "companyName": "Alfreds",
                "contactName": "Maria Anders",
                "contactTitle": "Sales Rep",
                "address": {
                    "street": "",
                    "city": "Berlin",
                    "region": "",
                    "postalCode": "",
                    "country": "Germany",
                    "phone": ""
                }
            })
        );
    }

    #[test]
    fn nulls_and_missing_fields_become_empty() {
        let record: CustomerRecord = serde_json::from_value(json!({
            "customerID": "BONAP",
            "companyName": "Bon app'",
            "contactTitle": null,
            "address": { "city": "Marseille", "region": null }
        }))
        .unwrap();

        assert_eq!(record.customer_id, "BONAP");
        assert_eq!(record.contact_name, "");
        assert_eq!(record.contact_title, "");
        assert_eq!(record.address.city, "Marseille");
        assert_eq!(record.address.region, "");
        assert_eq!(record.address.country, "");
    }

    #[test]
    fn null_address_defaults() {
        let record: CustomerRecord =
            serde_json::from_value(json!({ "customerID": "X", "address": null })).unwrap();
        assert_eq!(record.address, Address::default());
    }
}
