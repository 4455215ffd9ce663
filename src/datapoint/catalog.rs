//! The built-in catalog of standard data points.
//!
//! Aliases are stored in normalized form (see
//! [`normalize_header`](super::normalize_header)).

use serde::Serialize;

/// A standard field that headers can be mapped onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DataPoint {
    /// Canonical key, e.g. `email`.
    pub key: &'static str,
    /// Human-readable label used as the output header.
    pub label: &'static str,
    /// Short description for pickers.
    pub description: &'static str,
    /// Icon name for pickers.
    pub icon: &'static str,
    /// Common header spellings, normalized.
    pub aliases: &'static [&'static str],
}

static CATALOG: &[DataPoint] = &[
    DataPoint {
        key: "email",
        label: "Email",
        description: "Email address",
        icon: "mail",
        aliases: &["email", "e_mail", "email_address", "emailaddress", "mail"],
    },
    DataPoint {
        key: "first_name",
        label: "First Name",
        description: "Given name",
        icon: "user",
        aliases: &["first_name", "firstname", "fname", "given_name", "forename"],
    },
    DataPoint {
        key: "last_name",
        label: "Last Name",
        description: "Family name",
        icon: "user",
        aliases: &["last_name", "lastname", "lname", "surname", "family_name"],
    },
    DataPoint {
        key: "full_name",
        label: "Full Name",
        description: "Complete name of a person",
        icon: "user",
        aliases: &["name", "full_name", "fullname", "contact_name", "customer_name"],
    },
    DataPoint {
        key: "phone",
        label: "Phone",
        description: "Phone or mobile number",
        icon: "phone",
        aliases: &["phone", "phone_number", "phonenumber", "telephone", "mobile", "cell"],
    },
    DataPoint {
        key: "company",
        label: "Company",
        description: "Company or organization",
        icon: "building",
        aliases: &["company", "company_name", "organization", "organisation", "employer"],
    },
    DataPoint {
        key: "job_title",
        label: "Job Title",
        description: "Role or position",
        icon: "briefcase",
        aliases: &["job_title", "jobtitle", "title", "position", "role"],
    },
    DataPoint {
        key: "address",
        label: "Address",
        description: "Street address",
        icon: "map-pin",
        aliases: &["address", "street", "street_address", "address_line_1", "address1"],
    },
    DataPoint {
        key: "city",
        label: "City",
        description: "City or town",
        icon: "map",
        aliases: &["city", "town", "locality"],
    },
    DataPoint {
        key: "state",
        label: "State",
        description: "State, province or region",
        icon: "map",
        aliases: &["state", "province", "region", "county"],
    },
    DataPoint {
        key: "postal_code",
        label: "Postal Code",
        description: "ZIP or postal code",
        icon: "hash",
        aliases: &["zip", "zip_code", "zipcode", "postal_code", "postcode"],
    },
    DataPoint {
        key: "country",
        label: "Country",
        description: "Country name or code",
        icon: "globe",
        aliases: &["country", "country_code", "nation"],
    },
    DataPoint {
        key: "website",
        label: "Website",
        description: "Web address",
        icon: "link",
        aliases: &["website", "url", "homepage", "web_site"],
    },
    DataPoint {
        key: "date_of_birth",
        label: "Date of Birth",
        description: "Birth date",
        icon: "calendar",
        aliases: &["dob", "date_of_birth", "birth_date", "birthdate", "birthday"],
    },
    DataPoint {
        key: "created_at",
        label: "Created At",
        description: "Record creation or signup date",
        icon: "clock",
        aliases: &["created_at", "created", "date_created", "signup_date", "join_date"],
    },
    DataPoint {
        key: "notes",
        label: "Notes",
        description: "Free-form notes",
        icon: "file-text",
        aliases: &["notes", "note", "comments", "comment", "remarks"],
    },
];

/// All data points, in catalog order.
pub fn data_points() -> &'static [DataPoint] {
    CATALOG
}

/// Look up a data point by key.
pub fn find_data_point(key: &str) -> Option<&'static DataPoint> {
    CATALOG.iter().find(|dp| dp.key == key)
}
