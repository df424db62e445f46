use crate::models::{FormattedMonastery, MonasteryRecord, StoredDate};

/// Normalizes a stored record into its API-safe shape
///
/// The patron saint feast becomes a real date (or `None` when absent or
/// unparseable) and list fields are never null. Formatting is idempotent.
pub fn format_record(record: MonasteryRecord) -> FormattedMonastery {
    let patron_saint_date = record.feast_date();

    FormattedMonastery {
        id: record.id,
        name: record.name,
        slug: record.slug,
        description: record.description,
        short_description: record.short_description,
        address: record.address,
        city: record.city,
        county: record.county,
        region: record.region,
        patron_saint: record.patron_saint,
        patron_saint_date,
        founded_year: record.founded_year,
        history: record.history,
        special_features: record.special_features,
        relics: record.relics.unwrap_or_default(),
        icons: record.icons.unwrap_or_default(),
        site_type: record.site_type,
        images: record.images.unwrap_or_default(),
        cover_image: record.cover_image,
        email: record.email,
        phone: record.phone,
        website: record.website,
        latitude: record.latitude,
        longitude: record.longitude,
        verified: record.verified,
        admin_id: record.admin_id,
        created_at: record.created_at,
        updated_at: record.updated_at,
    }
}

impl From<FormattedMonastery> for MonasteryRecord {
    fn from(formatted: FormattedMonastery) -> Self {
        MonasteryRecord {
            id: formatted.id,
            name: formatted.name,
            slug: formatted.slug,
            description: formatted.description,
            short_description: formatted.short_description,
            address: formatted.address,
            city: formatted.city,
            county: formatted.county,
            region: formatted.region,
            patron_saint: formatted.patron_saint,
            patron_saint_date: formatted.patron_saint_date.map(StoredDate::Date),
            founded_year: formatted.founded_year,
            history: formatted.history,
            special_features: formatted.special_features,
            relics: Some(formatted.relics),
            icons: Some(formatted.icons),
            site_type: formatted.site_type,
            images: Some(formatted.images),
            cover_image: formatted.cover_image,
            email: formatted.email,
            phone: formatted.phone,
            website: formatted.website,
            latitude: formatted.latitude,
            longitude: formatted.longitude,
            verified: formatted.verified,
            admin_id: formatted.admin_id,
            created_at: formatted.created_at,
            updated_at: formatted.updated_at,
        }
    }
}
