//! # Contacts Service
//!
//! Contact listing, lookup, search, filtering and the enumerations that
//! drive the filter selectors.

use raildir_types::{
    Contact, ContactInput, CountEnvelope, DataEnvelope, MaybeEnveloped, PageRequest, Paginated,
};
use serde::de::IgnoredAny;
use serde::Deserialize;

use crate::api::{ApiClient, ApiRequest};
use crate::error::{Error, Result};

const CONTACTS: &str = "/api/contacts";
const COUNT: &str = "/api/contacts/count";
const SEARCH_NAME: &str = "/api/contacts/search/name";
const SEARCH_PHONE: &str = "/api/contacts/search/phone";
const BLOOD_GROUPS: &str = "/api/contacts/blood-groups";
const BY_BLOOD_GROUP: &str = "/api/contacts/by-blood-group";
const LOBBIES: &str = "/api/contacts/lobbies";
const DESIGNATIONS: &str = "/api/contacts/designations";
const BY_LOBBY: &str = "/api/contacts/by-lobby";
const FILTER: &str = "/api/contacts/filter";

const MISSING_BLOOD_GROUP_OR_LOBBY: &str = "At least one blood group or lobby is required";
const MISSING_LOBBY_OR_DESIGNATION: &str = "At least one lobby or designation is required";
const MISSING_ANY_FILTER: &str =
    "At least one filter (bloodGroup, lobby, or designation) is required";

/// Which filter endpoint a selection is sent to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FilterMode {
    /// Blood groups, optionally narrowed by lobby (`/by-blood-group`).
    BloodGroup,
    /// Lobbies, optionally narrowed by designation (`/by-lobby`).
    Lobby,
    /// Any combination of blood group, lobby and designation (`/filter`).
    #[default]
    Unified,
}

impl FilterMode {
    /// True when every dimension this mode sends is empty.
    #[must_use]
    pub fn is_unfilled(
        self,
        blood_groups: &[String],
        lobbies: &[String],
        designations: &[String],
    ) -> bool {
        match self {
            Self::BloodGroup => blood_groups.is_empty() && lobbies.is_empty(),
            Self::Lobby => lobbies.is_empty() && designations.is_empty(),
            Self::Unified => {
                blood_groups.is_empty() && lobbies.is_empty() && designations.is_empty()
            }
        }
    }

    /// Message of the error raised for an unfilled selection.
    #[must_use]
    pub fn requirement(self) -> &'static str {
        match self {
            Self::BloodGroup => MISSING_BLOOD_GROUP_OR_LOBBY,
            Self::Lobby => MISSING_LOBBY_OR_DESIGNATION,
            Self::Unified => MISSING_ANY_FILTER,
        }
    }
}

/// Phone lookup answers either with a page, an enveloped contact or a bare
/// contact, depending on the backend version.
#[derive(Deserialize)]
#[serde(untagged)]
enum PhoneLookup {
    Page(Paginated<Contact>),
    Enveloped(DataEnvelope<Contact>),
    Bare(Contact),
}

impl PhoneLookup {
    fn into_page(self) -> Paginated<Contact> {
        match self {
            Self::Page(page) => page,
            Self::Enveloped(envelope) => Paginated::single(envelope.data),
            Self::Bare(contact) => Paginated::single(contact),
        }
    }
}

/// Service for the `/api/contacts` resource family.
#[derive(Clone)]
pub struct ContactsService {
    client: ApiClient,
}

impl ContactsService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Total number of contacts.
    ///
    /// # Errors
    ///
    /// Propagates transport and API errors.
    pub async fn get_contacts_count(&self) -> Result<u64> {
        let response: CountEnvelope = self.client.get(COUNT).await?;
        Ok(response.count)
    }

    /// One page of all contacts.
    ///
    /// # Errors
    ///
    /// Propagates transport and API errors.
    pub async fn get_all_contacts(&self, page: PageRequest) -> Result<Paginated<Contact>> {
        self.client.execute(paged(ApiRequest::get(CONTACTS), page)).await
    }

    /// A single contact by id.
    ///
    /// # Errors
    ///
    /// Propagates transport and API errors (404 when the id is unknown).
    pub async fn get_contact(&self, id: &str) -> Result<Contact> {
        let response: MaybeEnveloped<Contact> =
            self.client.get(&format!("{CONTACTS}/{id}")).await?;
        Ok(response.into_inner())
    }

    /// Creates a contact.
    ///
    /// # Errors
    ///
    /// Propagates transport and API errors.
    pub async fn create_contact(&self, input: &ContactInput) -> Result<Contact> {
        let response: MaybeEnveloped<Contact> = self.client.post(CONTACTS, input).await?;
        Ok(response.into_inner())
    }

    /// Updates the fields set in `input`.
    ///
    /// # Errors
    ///
    /// Propagates transport and API errors.
    pub async fn update_contact(&self, id: &str, input: &ContactInput) -> Result<Contact> {
        let response: MaybeEnveloped<Contact> =
            self.client.put(&format!("{CONTACTS}/{id}"), input).await?;
        Ok(response.into_inner())
    }

    /// Deletes a contact.
    ///
    /// # Errors
    ///
    /// Propagates transport and API errors.
    pub async fn delete_contact(&self, id: &str) -> Result<()> {
        let _: IgnoredAny = self.client.delete(&format!("{CONTACTS}/{id}")).await?;
        Ok(())
    }

    /// Paginated search by name.
    ///
    /// # Errors
    ///
    /// Propagates transport and API errors.
    pub async fn search_by_name(&self, query: &str, page: PageRequest) -> Result<Paginated<Contact>> {
        let request = ApiRequest::get(SEARCH_NAME).query("query", query);
        self.client.execute(paged(request, page)).await
    }

    /// Looks up the contact owning `phone`.
    ///
    /// The result is always a page: a single match is wrapped with
    /// `page = limit = total = totalPages = 1`.
    ///
    /// # Errors
    ///
    /// Propagates transport and API errors (404 when nobody has the number).
    pub async fn search_by_phone(&self, phone: &str) -> Result<Paginated<Contact>> {
        let request = ApiRequest::get(SEARCH_PHONE).query("phone", phone);
        let response: PhoneLookup = self.client.execute(request).await?;
        Ok(response.into_page())
    }

    /// All blood groups present in the directory.
    ///
    /// # Errors
    ///
    /// Propagates transport and API errors.
    pub async fn get_blood_groups(&self) -> Result<Vec<String>> {
        self.enumeration(BLOOD_GROUPS).await
    }

    /// All lobbies present in the directory.
    ///
    /// # Errors
    ///
    /// Propagates transport and API errors.
    pub async fn get_lobbies(&self) -> Result<Vec<String>> {
        self.enumeration(LOBBIES).await
    }

    /// All designations present in the directory.
    ///
    /// # Errors
    ///
    /// Propagates transport and API errors.
    pub async fn get_designations(&self) -> Result<Vec<String>> {
        self.enumeration(DESIGNATIONS).await
    }

    /// Contacts matching any of `blood_groups` and/or `lobbies`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingFilter`] without any I/O when both lists are
    /// empty; otherwise propagates transport and API errors.
    pub async fn get_contacts_by_blood_group(
        &self,
        blood_groups: &[String],
        lobbies: &[String],
        page: PageRequest,
    ) -> Result<Paginated<Contact>> {
        if blood_groups.is_empty() && lobbies.is_empty() {
            return Err(Error::MissingFilter(MISSING_BLOOD_GROUP_OR_LOBBY));
        }
        let request = ApiRequest::get(BY_BLOOD_GROUP)
            .query_list("bloodGroup", blood_groups)
            .query_list("lobby", lobbies);
        self.client.execute(paged(request, page)).await
    }

    /// Contacts matching any of `lobbies` and/or `designations`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingFilter`] without any I/O when both lists are
    /// empty; otherwise propagates transport and API errors.
    pub async fn get_contacts_by_lobby(
        &self,
        lobbies: &[String],
        designations: &[String],
        page: PageRequest,
    ) -> Result<Paginated<Contact>> {
        if lobbies.is_empty() && designations.is_empty() {
            return Err(Error::MissingFilter(MISSING_LOBBY_OR_DESIGNATION));
        }
        let request = ApiRequest::get(BY_LOBBY)
            .query_list("lobby", lobbies)
            .query_list("designation", designations);
        self.client.execute(paged(request, page)).await
    }

    /// Unified filter over blood group, lobby and designation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingFilter`] without any I/O when all three lists
    /// are empty; otherwise propagates transport and API errors.
    pub async fn filter_contacts(
        &self,
        blood_groups: &[String],
        lobbies: &[String],
        designations: &[String],
        page: PageRequest,
    ) -> Result<Paginated<Contact>> {
        if blood_groups.is_empty() && lobbies.is_empty() && designations.is_empty() {
            return Err(Error::MissingFilter(MISSING_ANY_FILTER));
        }
        let request = ApiRequest::get(FILTER)
            .query_list("bloodGroup", blood_groups)
            .query_list("lobby", lobbies)
            .query_list("designation", designations);
        self.client.execute(paged(request, page)).await
    }

    /// Sends the dimensions `mode` uses to its endpoint. Dimensions the mode
    /// does not use are ignored.
    ///
    /// # Errors
    ///
    /// Same as the per-mode operation.
    pub async fn filter_by(
        &self,
        mode: FilterMode,
        blood_groups: &[String],
        lobbies: &[String],
        designations: &[String],
        page: PageRequest,
    ) -> Result<Paginated<Contact>> {
        match mode {
            FilterMode::BloodGroup => {
                self.get_contacts_by_blood_group(blood_groups, lobbies, page)
                    .await
            }
            FilterMode::Lobby => self.get_contacts_by_lobby(lobbies, designations, page).await,
            FilterMode::Unified => {
                self.filter_contacts(blood_groups, lobbies, designations, page)
                    .await
            }
        }
    }

    async fn enumeration(&self, endpoint: &str) -> Result<Vec<String>> {
        let response: DataEnvelope<Vec<String>> = self.client.get(endpoint).await?;
        Ok(response.data)
    }
}

fn paged(request: ApiRequest, page: PageRequest) -> ApiRequest {
    request.query("page", page.page).query("limit", page.limit)
}
