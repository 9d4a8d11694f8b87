use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{error::AppError, forms::MultipartForm};

/// Category labels the home page groups listings by.
pub const CATEGORY_TRENDING: &str = "Trending";
pub const CATEGORY_ULTRA: &str = "Ultra luxury";
pub const CATEGORY_LUXURY: &str = "Luxury Project";
pub const CATEGORY_PREMIUM: &str = "Premium Project";
pub const CATEGORY_AFFORDABLE: &str = "Affordable Project";

/// split_list
///
/// Turns a comma separated form value into its trimmed, non-empty items.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

// --- Listings ---

/// PropertyDetails
///
/// The free-text part of a listing. Every field maps one-to-one onto a form
/// input of the same (camelCase) name, see `PropertyDetails::FORM_FIELDS`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default, PartialEq)]
#[serde(default)]
pub struct PropertyDetails {
    pub name: String,
    pub location: String,
    pub location_about: String,
    pub rera_code: String,
    pub plan: String,
    pub price: String,
    pub status: String,
    pub configuration: String,
    pub possession: String,
    pub units: String,
    pub land: String,
    pub residence: String,
    pub builtup: String,
    pub blocks: String,
    pub floor: String,
    pub noofunits: String,
    pub rera: String,
    pub about: String,
    pub unitytype: String,
    pub size: String,
    pub range: String,
    pub booking: String,
    pub token: String,
    pub plans: String,
    pub amenities: String,
    pub virtual_tour: String,
    pub payment: String,
    pub icon: String,
    pub by: String,
    /// point1..point10 on the form.
    pub points: Vec<String>,
    /// logoText1..logoText10 on the form.
    pub logo_texts: Vec<String>,
}

impl PropertyDetails {
    /// Single-valued text inputs of the listing form, as
    /// `(form input name, document key)`.
    pub const FORM_FIELDS: &'static [(&'static str, &'static str)] = &[
        ("name", "name"),
        ("location", "location"),
        ("locationAbout", "location_about"),
        ("reraCode", "rera_code"),
        ("plan", "plan"),
        ("price", "price"),
        ("status", "status"),
        ("configuration", "configuration"),
        ("possession", "possession"),
        ("units", "units"),
        ("land", "land"),
        ("residence", "residence"),
        ("builtup", "builtup"),
        ("blocks", "blocks"),
        ("floor", "floor"),
        ("noofunits", "noofunits"),
        ("rera", "rera"),
        ("about", "about"),
        ("unitytype", "unitytype"),
        ("size", "size"),
        ("range", "range"),
        ("booking", "booking"),
        ("token", "token"),
        ("plans", "plans"),
        ("amenities", "amenities"),
        ("virtual", "virtual_tour"),
        ("payment", "payment"),
        ("icon", "icon"),
        ("by", "by"),
    ];

    fn field_mut(&mut self, form_name: &str) -> Option<&mut String> {
        let slot = match form_name {
            "name" => &mut self.name,
            "location" => &mut self.location,
            "locationAbout" => &mut self.location_about,
            "reraCode" => &mut self.rera_code,
            "plan" => &mut self.plan,
            "price" => &mut self.price,
            "status" => &mut self.status,
            "configuration" => &mut self.configuration,
            "possession" => &mut self.possession,
            "units" => &mut self.units,
            "land" => &mut self.land,
            "residence" => &mut self.residence,
            "builtup" => &mut self.builtup,
            "blocks" => &mut self.blocks,
            "floor" => &mut self.floor,
            "noofunits" => &mut self.noofunits,
            "rera" => &mut self.rera,
            "about" => &mut self.about,
            "unitytype" => &mut self.unitytype,
            "size" => &mut self.size,
            "range" => &mut self.range,
            "booking" => &mut self.booking,
            "token" => &mut self.token,
            "plans" => &mut self.plans,
            "amenities" => &mut self.amenities,
            "virtual" => &mut self.virtual_tour,
            "payment" => &mut self.payment,
            "icon" => &mut self.icon,
            "by" => &mut self.by,
            _ => return None,
        };
        Some(slot)
    }

    /// Overwrites every field the form carries; absent inputs keep their value.
    pub fn merge_form(&mut self, form: &MultipartForm) {
        for &(name, _) in Self::FORM_FIELDS {
            if let (Some(value), Some(slot)) = (form.text(name), self.field_mut(name)) {
                *slot = value.to_string();
            }
        }
        merge_indexed(&mut self.points, form, "point", 10);
        merge_indexed(&mut self.logo_texts, form, "logoText", 10);
    }
}

/// Fills `slots[i]` from `{prefix}{i + 1}` for each input the form carries.
fn merge_indexed(slots: &mut Vec<String>, form: &MultipartForm, prefix: &str, count: usize) {
    if slots.len() < count {
        slots.resize(count, String::new());
    }
    for index in 0..count {
        if let Some(value) = form.text(&format!("{}{}", prefix, index + 1)) {
            slots[index] = value.to_string();
        }
    }
}

/// PropertyMedia
///
/// Absolute URLs of the files uploaded with a listing. Empty strings mark
/// slots without an upload.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default, PartialEq)]
#[serde(default)]
pub struct PropertyMedia {
    pub image_url: String,
    pub plogo: String,
    pub location_image: String,
    pub floor_images: Vec<String>,
    pub logos: Vec<String>,
    pub pdfs: Vec<String>,
    pub virtual_videos: Vec<String>,
}

impl PropertyMedia {
    /// File inputs accepted by the listing form.
    pub const FILE_FIELDS: &'static [&'static str] = &[
        "imageUrl", "Plogo", "icon", "rera", "locationImage",
        "floorImg1", "floorImg2", "floorImg3", "floorImg4", "floorImg5",
        "floorImg6", "floorImg7", "floorImg8", "floorImg9", "floorImg10",
        "logo1", "logo2", "logo3", "logo4", "logo5",
        "logo6", "logo7", "logo8", "logo9", "logo10",
        "virtualVid8", "virtualVid9", "virtualVid10",
        "pdf1", "pdf2", "pdf3", "pdf4",
    ];

    pub fn from_form(form: &MultipartForm) -> Self {
        Self {
            image_url: form.file_url("imageUrl").unwrap_or_default().to_string(),
            plogo: form.file_url("Plogo").unwrap_or_default().to_string(),
            location_image: form.file_url("locationImage").unwrap_or_default().to_string(),
            floor_images: form.indexed_files("floorImg", 1..=10),
            logos: form.indexed_files("logo", 1..=10),
            pdfs: form.indexed_files("pdf", 1..=4),
            virtual_videos: form.indexed_files("virtualVid", 8..=10),
        }
    }
}

/// Property
///
/// A real-estate listing. `developer` loosely references `Developer::id`;
/// nothing enforces that the developer still exists.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default, PartialEq)]
#[serde(default)]
pub struct Property {
    pub id: Uuid,
    pub developer: Option<Uuid>,
    #[serde(flatten)]
    pub details: PropertyDetails,
    #[serde(flatten)]
    pub media: PropertyMedia,
    pub categories: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Hidden input sent by the listing edit form alongside the category checkboxes.
pub const CATEGORIES_MARKER: &str = "categories_present";

impl Property {
    /// Builds a new listing from the create form. The developer must already
    /// have been resolved by the caller.
    pub fn from_form(form: &MultipartForm, developer: Uuid) -> Self {
        let now = Utc::now();
        let mut details = PropertyDetails::default();
        details.merge_form(form);

        // An uploaded icon/RERA file replaces the text value of the same name.
        if let Some(url) = form.file_url("icon") {
            details.icon = url.to_string();
        }
        if let Some(url) = form.file_url("rera") {
            details.rera = url.to_string();
        }

        Self {
            id: Uuid::new_v4(),
            developer: Some(developer),
            details,
            media: PropertyMedia::from_form(form),
            categories: form.list("categories"),
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies the edit form. A new `imageUrl` upload replaces both the cover
    /// image and the project logo; media is otherwise left untouched.
    ///
    /// Unchecked checkboxes are not submitted at all, so the edit form carries
    /// a `categories_present` marker: with it, missing `categories` means none.
    pub fn apply_update(&mut self, form: &MultipartForm) {
        self.details.merge_form(form);
        if form.text(CATEGORIES_MARKER).is_some() || form.text("categories").is_some() {
            self.categories = form.list("categories");
        }
        if let Some(url) = form.file_url("imageUrl") {
            self.media.image_url = url.to_string();
            self.media.plogo = url.to_string();
        }
        self.updated_at = Utc::now();
    }

    pub fn has_category(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }
}

/// CategorisedProperties
///
/// The home page buckets. A listing appears in every bucket whose category it
/// carries.
#[derive(Debug, Clone, Serialize, Default)]
pub struct CategorisedProperties {
    pub trending: Vec<Property>,
    pub ultra: Vec<Property>,
    pub luxury: Vec<Property>,
    pub premium: Vec<Property>,
    pub affordable: Vec<Property>,
}

impl CategorisedProperties {
    pub fn from_properties(properties: &[Property]) -> Self {
        let bucket = |category: &str| -> Vec<Property> {
            properties
                .iter()
                .filter(|p| p.has_category(category))
                .cloned()
                .collect()
        };
        Self {
            trending: bucket(CATEGORY_TRENDING),
            ultra: bucket(CATEGORY_ULTRA),
            luxury: bucket(CATEGORY_LUXURY),
            premium: bucket(CATEGORY_PREMIUM),
            affordable: bucket(CATEGORY_AFFORDABLE),
        }
    }
}

/// PropertyFilter
///
/// Listing query used by the home page, the search endpoint and the admin
/// dashboard. Unset members do not constrain the result.
#[derive(Debug, Clone, Default)]
pub struct PropertyFilter {
    /// Matches listings carrying any of these categories.
    pub categories: Vec<String>,
    /// Case-insensitive literal substring over name or about.
    pub search: Option<String>,
    /// Exact developer id (as text, so malformed ids simply match nothing).
    pub developer: Option<String>,
    pub status: Option<String>,
    /// Case-insensitive literal substring over the name only.
    pub name: Option<String>,
}

impl PropertyFilter {
    pub fn matches(&self, property: &Property) -> bool {
        if !self.categories.is_empty()
            && !self.categories.iter().any(|c| property.has_category(c))
        {
            return false;
        }
        if let Some(search) = &self.search {
            if !contains_ignore_case(&property.details.name, search)
                && !contains_ignore_case(&property.details.about, search)
            {
                return false;
            }
        }
        if let Some(developer) = &self.developer {
            if property.developer.map(|d| d.to_string()).as_deref() != Some(developer.as_str()) {
                return false;
            }
        }
        if let Some(status) = &self.status {
            if &property.details.status != status {
                return false;
            }
        }
        if let Some(name) = &self.name {
            if !contains_ignore_case(&property.details.name, name) {
                return false;
            }
        }
        true
    }
}

pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// LocationSummary
///
/// One row of the "listings by location" aggregation on the home page.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema, Default, PartialEq)]
pub struct LocationSummary {
    pub location: String,
    pub count: i64,
    /// Location image of the first listing (by creation time) in the group.
    pub location_image: String,
}

// --- Developers ---

/// Developer
///
/// An organisation profile. `slug` is the free-form "id" the admin types on
/// the form; the database identity is `id`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default, PartialEq)]
#[serde(default)]
pub struct Developer {
    pub id: Uuid,
    pub slug: String,
    pub logo: String,
    pub name: String,
    pub established: String,
    pub project: String,
    pub short_description: String,
    pub long_description: String,
    pub ongoing_projects: Vec<String>,
    pub city_present: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Developer {
    pub fn from_form(form: &MultipartForm) -> Self {
        let now = Utc::now();
        let text = |name: &str| form.text(name).unwrap_or_default().to_string();
        Self {
            id: Uuid::new_v4(),
            slug: text("id"),
            logo: form.file_url("logo").unwrap_or_default().to_string(),
            name: text("name"),
            established: text("established"),
            project: text("project"),
            short_description: text("shortDescription"),
            long_description: text("longDescription"),
            ongoing_projects: form.list("ongoingProjects"),
            city_present: form.list("cityPresent"),
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies the edit form. The logo changes to a new upload, else to the
    /// `logo` text input, else stays. List inputs are comma separated and an
    /// absent list clears the field.
    pub fn apply_update(&mut self, form: &MultipartForm) {
        if let Some(url) = form.file_url("logo") {
            self.logo = url.to_string();
        } else if let Some(existing) = form.text("logo") {
            self.logo = existing.to_string();
        }
        let mut set = |slot: &mut String, name: &str| {
            if let Some(value) = form.text(name) {
                *slot = value.to_string();
            }
        };
        set(&mut self.name, "name");
        set(&mut self.established, "established");
        set(&mut self.project, "project");
        set(&mut self.short_description, "shortDescription");
        set(&mut self.long_description, "longDescription");
        self.ongoing_projects = form.list("ongoingProjects");
        self.city_present = form.list("cityPresent");
        self.updated_at = Utc::now();
    }
}

// --- Blog ---

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default, PartialEq)]
#[serde(default)]
pub struct Blog {
    pub id: Uuid,
    pub heading: String,
    pub heading_one: String,
    pub about: String,
    pub about_one: String,
    pub image: String,
    pub img_one: String,
    pub location: String,
    pub dates: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Blog {
    /// Builds a post from the create form. All fields but `dates` are
    /// mandatory, including both images.
    pub fn from_form(form: &MultipartForm) -> Result<Self, AppError> {
        let now = Utc::now();
        let image = form
            .file_url("image")
            .ok_or_else(|| AppError::bad_request("image is required"))?;
        let img_one = form
            .file_url("imgOne")
            .ok_or_else(|| AppError::bad_request("imgOne is required"))?;

        Ok(Self {
            id: Uuid::new_v4(),
            heading: form.require("heading")?.to_string(),
            heading_one: form.require("headingOne")?.to_string(),
            about: form.require("about")?.to_string(),
            about_one: form.require("aboutOne")?.to_string(),
            image: image.to_string(),
            img_one: img_one.to_string(),
            location: form.require("location")?.to_string(),
            dates: form.text("dates").unwrap_or_default().to_string(),
            created_at: now,
            updated_at: now,
        })
    }

    pub fn apply_update(&mut self, form: &MultipartForm) {
        let mut set = |slot: &mut String, name: &str| {
            if let Some(value) = form.text(name) {
                *slot = value.to_string();
            }
        };
        set(&mut self.heading, "heading");
        set(&mut self.heading_one, "headingOne");
        set(&mut self.about, "about");
        set(&mut self.about_one, "aboutOne");
        set(&mut self.location, "location");
        set(&mut self.dates, "dates");
        if let Some(url) = form.file_url("image") {
            self.image = url.to_string();
        }
        if let Some(url) = form.file_url("imgOne") {
            self.img_one = url.to_string();
        }
        self.updated_at = Utc::now();
    }
}

// --- Careers ---

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default, PartialEq)]
#[serde(default)]
pub struct Career {
    pub id: Uuid,
    pub role: String,
    pub experience: String,
    pub location: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Career posting form (urlencoded).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct CareerForm {
    pub role: String,
    pub experience: String,
    pub location: String,
}

impl From<CareerForm> for Career {
    fn from(form: CareerForm) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            role: form.role,
            experience: form.experience,
            location: form.location,
            created_at: now,
            updated_at: now,
        }
    }
}

// --- Leads, tasks, testimonials ---

/// User
///
/// A contact lead captured by the public enquiry form.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default, PartialEq)]
#[serde(default)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub number: String,
    pub created_at: DateTime<Utc>,
}

/// AddUserRequest
///
/// Input of POST /add-user, accepted as JSON or urlencoded form.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
pub struct AddUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub number: Option<String>,
}

impl AddUserRequest {
    /// Returns the lead when every field is present and non-blank.
    pub fn into_user(self) -> Option<User> {
        let present = |value: Option<String>| value.filter(|v| !v.trim().is_empty());
        Some(User {
            id: Uuid::new_v4(),
            name: present(self.name)?,
            email: present(self.email)?,
            number: present(self.number)?,
            created_at: Utc::now(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default, PartialEq)]
#[serde(default)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Testimonial
///
/// Shown on the home page; the admin forms call it a "test".
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default, PartialEq)]
#[serde(default)]
pub struct Testimonial {
    pub id: Uuid,
    pub logo: String,
    pub name: String,
    pub long_description: String,
    pub city_present: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Testimonial {
    pub fn from_form(form: &MultipartForm) -> Self {
        let now = Utc::now();
        let text = |name: &str| form.text(name).unwrap_or_default().to_string();
        Self {
            id: Uuid::new_v4(),
            logo: form.file_url("logo").unwrap_or_default().to_string(),
            name: text("name"),
            long_description: text("longDescription"),
            city_present: text("cityPresent"),
            created_at: now,
            updated_at: now,
        }
    }

    /// The logo changes to a new upload, else to `existingLogo`, else stays.
    pub fn apply_update(&mut self, form: &MultipartForm) {
        if let Some(url) = form.file_url("logo") {
            self.logo = url.to_string();
        } else if let Some(existing) = form.text("existingLogo") {
            self.logo = existing.to_string();
        }
        if let Some(name) = form.text("name") {
            self.name = name.to_string();
        }
        if let Some(description) = form.text("longDescription") {
            self.long_description = description.to_string();
        }
        if let Some(cities) = form.text("cityPresent") {
            self.city_present = cities.to_string();
        }
        self.updated_at = Utc::now();
    }
}

// --- Responses ---

/// MessageResponse
///
/// Small JSON acknowledgement body.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// ErrorResponse
///
/// JSON error body of the JSON endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}
