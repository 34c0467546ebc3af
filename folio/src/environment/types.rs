use folio_core_contact_impl::ContactServiceImpl;
use folio_core_health_impl::HealthServiceImpl;
use folio_extern_impl::mail::MailApiServiceImpl;

// Extern
pub type MailApi = MailApiServiceImpl;

// Core
pub type ContactFeature = ContactServiceImpl<MailApi>;
pub type HealthFeature = HealthServiceImpl<MailApi>;

// API
pub type RestServer = folio_api_rest::RestServer<HealthFeature, ContactFeature>;
