//! One entry point for every supported record type

use crate::epo::{
    BiblioProvider, FamilyMember, FamilyProvider, Inpadoc, InpadocBiblio, SearchProvider,
};
use crate::uspto::{
    ApplicationProvider, Assignment, AssignmentProvider, Document, DocumentProvider, Product,
    ProductProvider, UsApplication,
};
use patent_client_core::Result;
use patent_client_engine::{ClientConfig, Manager, Provider, Session};
use std::fmt;
use std::sync::Arc;

/// Managers for every record type, sharing one configuration and session
///
/// # Example
///
/// ```ignore
/// let client = Client::connect(ClientConfig::default())?;
/// let tesla = client.inpadoc().filter("applicant", "Tesla");
/// println!("{} publications", tesla.count()?);
/// ```
#[derive(Clone)]
pub struct Client {
    config: ClientConfig,
    session: Session,
    search: Arc<dyn Provider>,
    family: Arc<dyn Provider>,
    biblio: Arc<dyn Provider>,
    applications: Arc<dyn Provider>,
    documents: Arc<dyn Provider>,
    assignments: Arc<dyn Provider>,
    products: Arc<dyn Provider>,
}

impl Client {
    /// Client fetching through `session`
    ///
    /// # Errors
    ///
    /// [`patent_client_core::Error::Config`] if `config` fails validation.
    pub fn new(config: ClientConfig, session: Session) -> Result<Self> {
        config.validate()?;
        Ok(Client {
            search: Arc::new(SearchProvider::new(&config.epo)),
            family: Arc::new(FamilyProvider::new(&config.epo)),
            biblio: Arc::new(BiblioProvider::new(&config.epo)),
            applications: Arc::new(ApplicationProvider::new(&config.odp)),
            documents: Arc::new(DocumentProvider::new(&config.odp)),
            assignments: Arc::new(AssignmentProvider::new(&config.assignment)),
            products: Arc::new(ProductProvider::new(&config.bulk_data)),
            config,
            session,
        })
    }

    /// Client over real HTTP, honoring `config.http`
    #[cfg(feature = "http")]
    pub fn connect(config: ClientConfig) -> Result<Self> {
        let transport = patent_client_engine::HttpTransport::new(&config.http)?;
        Self::new(config, Session::new(transport))
    }

    /// Configuration in use
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Transports in use
    pub fn session(&self) -> &Session {
        &self.session
    }

    fn manager<M: patent_client_core::Model>(&self, provider: &Arc<dyn Provider>) -> Manager<M> {
        Manager::new(provider.clone(), self.session.clone())
    }

    /// EPO published-data search results
    pub fn inpadoc(&self) -> Manager<Inpadoc> {
        self.manager(&self.search)
    }

    /// EPO INPADOC family members; filter by `number`
    pub fn family(&self) -> Manager<FamilyMember> {
        self.manager(&self.family)
    }

    /// EPO bibliographic data of one publication; filter by `number`
    pub fn biblio(&self) -> Manager<InpadocBiblio> {
        self.manager(&self.biblio)
    }

    /// USPTO applications from the Open Data Portal
    pub fn applications(&self) -> Manager<UsApplication> {
        self.manager(&self.applications)
    }

    /// File wrapper documents of one application; filter by `appl_id`
    pub fn documents(&self) -> Manager<Document> {
        self.manager(&self.documents)
    }

    /// USPTO recorded assignments
    pub fn assignments(&self) -> Manager<Assignment> {
        self.manager(&self.assignments)
    }

    /// USPTO bulk data products
    pub fn products(&self) -> Manager<Product> {
        self.manager(&self.products)
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.config)
            .field("session", &self.session)
            .finish()
    }
}
