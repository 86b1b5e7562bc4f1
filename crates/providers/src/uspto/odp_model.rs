//! Open Data Portal record types and their alias tables
//!
//! Wire names are camelCase with acronyms (`ipOfficeDayDelayQuantity`,
//! `class/subclass`), so every field path is declared explicitly.

use chrono::{DateTime, FixedOffset, NaiveDate};
use once_cell::sync::Lazy;
use patent_client_core::{AliasTable, FieldKind, Model};
use serde::Deserialize;

// ============================================================================
// Shared
// ============================================================================

/// Postal address
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Address {
    /// City
    pub city_name: Option<String>,
    /// State or province name
    pub geographic_region_name: Option<String>,
    /// State or province code
    pub geographic_region_code: Option<String>,
    /// ISO country code
    pub country_code: Option<String>,
    /// Postal code
    pub postal_code: Option<String>,
    /// Country name
    pub country_name: Option<String>,
    /// First street line
    pub address_line_one_text: Option<String>,
    /// Second street line
    pub address_line_two_text: Option<String>,
    /// First name line
    pub name_line_one_text: Option<String>,
    /// Second name line
    pub name_line_two_text: Option<String>,
    /// Address kind, e.g. `Mailing`
    pub postal_address_category: Option<String>,
    /// Correspondent the address belongs to
    pub correspondent_name_text: Option<String>,
}

static ADDRESS: Lazy<AliasTable> = Lazy::new(|| {
    AliasTable::builder("Address")
        .field("city_name", "cityName", FieldKind::Str)
        .field("geographic_region_name", "geographicRegionName", FieldKind::Str)
        .field("geographic_region_code", "geographicRegionCode", FieldKind::Str)
        .field("country_code", "countryCode", FieldKind::Str)
        .field("postal_code", "postalCode", FieldKind::Str)
        .field("country_name", "countryName", FieldKind::Str)
        .field("address_line_one_text", "addressLineOneText", FieldKind::Str)
        .field("address_line_two_text", "addressLineTwoText", FieldKind::Str)
        .field("name_line_one_text", "nameLineOneText", FieldKind::Str)
        .field("name_line_two_text", "nameLineTwoText", FieldKind::Str)
        .field("postal_address_category", "postalAddressCategory", FieldKind::Str)
        .field("correspondent_name_text", "correspondentNameText", FieldKind::Str)
        .build()
});

fn address() -> &'static AliasTable {
    &ADDRESS
}

// ============================================================================
// Parties
// ============================================================================

/// Named inventor
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Inventor {
    /// Given name
    pub first_name: Option<String>,
    /// Family name
    pub last_name: Option<String>,
    /// Name as printed on the application
    pub full_name: Option<String>,
    /// Correspondence addresses
    pub addresses: Vec<Address>,
}

static INVENTOR: Lazy<AliasTable> = Lazy::new(|| {
    AliasTable::builder("Inventor")
        .field("first_name", "firstName", FieldKind::Str)
        .field("last_name", "lastName", FieldKind::Str)
        .field("full_name", "inventorNameText", FieldKind::Str)
        .field("addresses", "correspondenceAddressBag", FieldKind::records(address))
        .build()
});

fn inventor() -> &'static AliasTable {
    &INVENTOR
}

/// Applicant of record
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Applicant {
    /// Applicant name
    pub applicant_name: Option<String>,
    /// Correspondence addresses
    pub addresses: Vec<Address>,
}

static APPLICANT: Lazy<AliasTable> = Lazy::new(|| {
    AliasTable::builder("Applicant")
        .field("applicant_name", "applicantNameText", FieldKind::Str)
        .field("addresses", "correspondenceAddressBag", FieldKind::records(address))
        .build()
});

fn applicant() -> &'static AliasTable {
    &APPLICANT
}

// ============================================================================
// Continuity, priority, transactions
// ============================================================================

/// One parent or child continuity link
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Relationship {
    /// Status code of the related application
    pub application_status_code: Option<i64>,
    /// Continuity type, e.g. `CON`, `DIV`, `CIP`
    pub claim_type_code: Option<String>,
    /// Filing date of the related application
    pub filing_date: Option<NaiveDate>,
    /// Status text of the related application
    pub application_status_description: Option<String>,
    /// Continuity type in words
    pub claim_type_description: Option<String>,
    /// Parent application number
    pub parent_application_id: Option<String>,
    /// Child application number
    pub child_application_id: Option<String>,
}

static RELATIONSHIP: Lazy<AliasTable> = Lazy::new(|| {
    AliasTable::builder("Relationship")
        .field("application_status_code", "applicationStatusCode", FieldKind::Int)
        .field("claim_type_code", "claimParentageTypeCode", FieldKind::Str)
        .field("filing_date", "filingDate", FieldKind::Date)
        .field(
            "application_status_description",
            "applicationStatusDescriptionText",
            FieldKind::Str,
        )
        .field(
            "claim_type_description",
            "claimParentageTypeCodeDescription",
            FieldKind::Str,
        )
        .field("parent_application_id", "parentApplicationNumberText", FieldKind::Str)
        .field("child_application_id", "childApplicationNumberText", FieldKind::Str)
        .build()
});

fn relationship() -> &'static AliasTable {
    &RELATIONSHIP
}

/// Foreign priority claim
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ForeignPriority {
    /// Foreign application number
    pub priority_number: Option<String>,
    /// Foreign filing date
    pub filing_date: Option<NaiveDate>,
    /// Country of the foreign filing
    pub country_name: Option<String>,
}

static FOREIGN_PRIORITY: Lazy<AliasTable> = Lazy::new(|| {
    AliasTable::builder("ForeignPriority")
        .field("priority_number", "priorityNumberText", FieldKind::Str)
        .field("filing_date", "filingDate", FieldKind::Date)
        .field("country_name", "countryName", FieldKind::Str)
        .build()
});

fn foreign_priority() -> &'static AliasTable {
    &FOREIGN_PRIORITY
}

/// File wrapper transaction
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Transaction {
    /// Date the action was recorded
    pub recorded_date: Option<NaiveDate>,
    /// Case action code
    pub transaction_code: Option<String>,
    /// Case action description
    pub transaction_description: Option<String>,
}

static TRANSACTION: Lazy<AliasTable> = Lazy::new(|| {
    AliasTable::builder("Transaction")
        .field("recorded_date", "recordedDate", FieldKind::Date)
        .field("transaction_code", "caseActionCode", FieldKind::Str)
        .field("transaction_description", "caseActionDescriptionText", FieldKind::Str)
        .build()
});

fn transaction() -> &'static AliasTable {
    &TRANSACTION
}

// ============================================================================
// Attorneys
// ============================================================================

/// Phone or fax number of a practitioner
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TelecommunicationAddress {
    /// Number as registered
    pub telecommunication_number: Option<String>,
    /// `TEL`, `FAX` and so on
    pub usage_type_category: Option<String>,
}

static TELECOMMUNICATION_ADDRESS: Lazy<AliasTable> = Lazy::new(|| {
    AliasTable::builder("TelecommunicationAddress")
        .field("telecommunication_number", "telecommunicationNumber", FieldKind::Str)
        .field("usage_type_category", "usageTypeCategory", FieldKind::Str)
        .build()
});

fn telecommunication_address() -> &'static AliasTable {
    &TELECOMMUNICATION_ADDRESS
}

/// Registered practitioner of record
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Attorney {
    /// Registration status, e.g. `ACTIVE`
    pub active_indicator: Option<String>,
    /// Given name
    pub first_name: Option<String>,
    /// Family name
    pub last_name: Option<String>,
    /// Suffix such as `Jr.`
    pub name_suffix: Option<String>,
    /// USPTO registration number
    pub registration_number: Option<String>,
    /// `ATTNY` or `AGENT`
    pub registered_practitioner_category: Option<String>,
    /// Business addresses
    pub addresses: Vec<Address>,
    /// Phone and fax numbers
    pub telecommunication_addresses: Vec<TelecommunicationAddress>,
}

static ATTORNEY: Lazy<AliasTable> = Lazy::new(|| {
    AliasTable::builder("Attorney")
        .field("active_indicator", "activeIndicator", FieldKind::Str)
        .field("first_name", "firstName", FieldKind::Str)
        .field("last_name", "lastName", FieldKind::Str)
        .field("name_suffix", "nameSuffix", FieldKind::Str)
        .field("registration_number", "registrationNumber", FieldKind::Str)
        .field(
            "registered_practitioner_category",
            "registeredPractitionerCategory",
            FieldKind::Str,
        )
        .field("addresses", "attorneyAddressBag", FieldKind::records(address))
        .field(
            "telecommunication_addresses",
            "telecommunicationAddressBag",
            FieldKind::records(telecommunication_address),
        )
        .build()
});

fn attorney() -> &'static AliasTable {
    &ATTORNEY
}

/// Customer number holding power of attorney, with its practitioners
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CustomerNumber {
    /// Customer number holding power of attorney
    pub customer_number: Option<String>,
    /// Power of attorney address
    pub address: Option<Address>,
    /// Practitioners associated with the customer number
    pub attorneys: Vec<Attorney>,
}

static CUSTOMER_NUMBER: Lazy<AliasTable> = Lazy::new(|| {
    AliasTable::builder("CustomerNumber")
        .field("customer_number", "customerNumber.patronIdentifier", FieldKind::Str)
        .field(
            "address",
            "customerNumber.powerOfAttorneyAddressBag[0]",
            FieldKind::Nested(address),
        )
        .field("attorneys", "attorneyBag", FieldKind::records(attorney))
        .build()
});

fn customer_number() -> &'static AliasTable {
    &CUSTOMER_NUMBER
}

// ============================================================================
// Assignments
// ============================================================================

/// Conveying party
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Assignor {
    /// Date the assignor signed
    pub execution_date: Option<NaiveDate>,
    /// Assignor name
    pub assignor_name: Option<String>,
}

static ASSIGNOR: Lazy<AliasTable> = Lazy::new(|| {
    AliasTable::builder("Assignor")
        .field("execution_date", "executionDate", FieldKind::Date)
        .field("assignor_name", "assignorName", FieldKind::Str)
        .build()
});

fn assignor() -> &'static AliasTable {
    &ASSIGNOR
}

/// Receiving party's address
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AssigneeAddress {
    /// City
    pub city_name: Option<String>,
    /// State or province code
    pub geographic_region_code: Option<String>,
    /// Postal code
    pub postal_code: Option<String>,
    /// First street line
    pub address_line_one_text: Option<String>,
}

static ASSIGNEE_ADDRESS: Lazy<AliasTable> = Lazy::new(|| {
    AliasTable::builder("AssigneeAddress")
        .field("city_name", "cityName", FieldKind::Str)
        .field("geographic_region_code", "geographicRegionCode", FieldKind::Str)
        .field("postal_code", "postalCode", FieldKind::Str)
        .field("address_line_one_text", "addressLineOneText", FieldKind::Str)
        .build()
});

fn assignee_address() -> &'static AliasTable {
    &ASSIGNEE_ADDRESS
}

/// Receiving party
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Assignee {
    /// Assignee name
    pub assignee_name: Option<String>,
    /// Assignee address
    pub assignee_address: Option<AssigneeAddress>,
}

static ASSIGNEE: Lazy<AliasTable> = Lazy::new(|| {
    AliasTable::builder("Assignee")
        .field("assignee_name", "assigneeNameText", FieldKind::Str)
        .field(
            "assignee_address",
            "assigneeAddress",
            FieldKind::Nested(assignee_address),
        )
        .build()
});

fn assignee() -> &'static AliasTable {
    &ASSIGNEE
}

/// Assignment recorded against an application
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApplicationAssignment {
    /// Reel of the recordation
    pub reel_number: Option<String>,
    /// Frame of the recordation
    pub frame_number: Option<String>,
    /// `reel/frame`
    pub reel_frame: Option<String>,
    /// Number of pages recorded
    pub page_number: Option<i64>,
    /// Received date
    pub received_date: Option<NaiveDate>,
    /// Recorded date
    pub recorded_date: Option<NaiveDate>,
    /// Mailed date
    pub mailed_date: Option<NaiveDate>,
    /// Conveyance, e.g. `ASSIGNMENT OF ASSIGNORS INTEREST`
    pub conveyance_text: Option<String>,
    /// Assignors
    pub assignors: Vec<Assignor>,
    /// Assignees
    pub assignees: Vec<Assignee>,
    /// Correspondence address
    pub correspondence_address: Vec<Address>,
}

static APPLICATION_ASSIGNMENT: Lazy<AliasTable> = Lazy::new(|| {
    AliasTable::builder("ApplicationAssignment")
        .field("reel_number", "reelNumber", FieldKind::Str)
        .field("frame_number", "frameNumber", FieldKind::Str)
        .field("reel_frame", "reelNumber/frameNumber", FieldKind::Str)
        .field("page_number", "pageNumber", FieldKind::Int)
        .field("received_date", "assignmentReceivedDate", FieldKind::Date)
        .field("recorded_date", "assignmentRecordedDate", FieldKind::Date)
        .field("mailed_date", "assignmentMailedDate", FieldKind::Date)
        .field("conveyance_text", "conveyanceText", FieldKind::Str)
        .field("assignors", "assignorBag", FieldKind::records(assignor))
        .field("assignees", "assigneeBag", FieldKind::records(assignee))
        .field(
            "correspondence_address",
            "correspondenceAddress",
            FieldKind::records(address),
        )
        .build()
});

fn application_assignment() -> &'static AliasTable {
    &APPLICATION_ASSIGNMENT
}

// ============================================================================
// Patent term adjustment
// ============================================================================

/// One event counted in the term adjustment
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TermAdjustmentHistory {
    /// Days charged to the applicant
    pub applicant_day_delay_quantity: Option<i64>,
    /// Start sequence number
    pub start_sequence_number: Option<f64>,
    /// Action that started or stopped the clock
    pub case_action_description_text: Option<String>,
    /// Case action sequence number
    pub case_action_sequence_number: Option<f64>,
    /// Action date
    pub action_date: Option<NaiveDate>,
}

static TERM_ADJUSTMENT_HISTORY: Lazy<AliasTable> = Lazy::new(|| {
    AliasTable::builder("TermAdjustmentHistory")
        .field(
            "applicant_day_delay_quantity",
            "applicantDayDelayQuantity",
            FieldKind::Int,
        )
        .field("start_sequence_number", "startSequenceNumber", FieldKind::Float)
        .field(
            "case_action_description_text",
            "caseActionDescriptionText",
            FieldKind::Str,
        )
        .field(
            "case_action_sequence_number",
            "caseActionSequenceNumber",
            FieldKind::Float,
        )
        .field("action_date", "actionDate", FieldKind::Date)
        .build()
});

fn term_adjustment_history() -> &'static AliasTable {
    &TERM_ADJUSTMENT_HISTORY
}

/// Patent term adjustment summary
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TermAdjustment {
    /// Days of applicant delay
    pub applicant_day_delay_quantity: Option<i64>,
    /// Days where A and B delays overlap
    pub overlapping_day_quantity: Option<i64>,
    /// Filing date
    pub filing_date: Option<NaiveDate>,
    /// C delay days
    pub c_delay_quantity: Option<i64>,
    /// Net adjustment in days
    pub adjustment_total_quantity: Option<i64>,
    /// B delay days
    pub b_delay_quantity: Option<i64>,
    /// Grant date
    pub grant_date: Option<NaiveDate>,
    /// A delay days
    pub a_delay_quantity: Option<i64>,
    /// Non overlapping day quantity
    pub non_overlapping_day_quantity: Option<i64>,
    /// Days of office delay
    pub ip_office_day_delay_quantity: Option<i64>,
    /// Events the adjustment was computed from
    pub history: Vec<TermAdjustmentHistory>,
}

static TERM_ADJUSTMENT: Lazy<AliasTable> = Lazy::new(|| {
    AliasTable::builder("TermAdjustment")
        .field(
            "applicant_day_delay_quantity",
            "applicantDayDelayQuantity",
            FieldKind::Int,
        )
        .field("overlapping_day_quantity", "overlappingDayQuantity", FieldKind::Int)
        .field("filing_date", "filingDate", FieldKind::Date)
        .field("c_delay_quantity", "cDelayQuantity", FieldKind::Int)
        .field("adjustment_total_quantity", "adjustmentTotalQuantity", FieldKind::Int)
        .field("b_delay_quantity", "bDelayQuantity", FieldKind::Int)
        .field("grant_date", "grantDate", FieldKind::Date)
        .field("a_delay_quantity", "aDelayQuantity", FieldKind::Int)
        .field(
            "non_overlapping_day_quantity",
            "nonOverlappingDayQuantity",
            FieldKind::Int,
        )
        .field(
            "ip_office_day_delay_quantity",
            "ipOfficeDayDelayQuantity",
            FieldKind::Int,
        )
        .field(
            "history",
            "patentTermAdjustmentHistoryDataBag",
            FieldKind::records(term_adjustment_history),
        )
        .build()
});

fn term_adjustment() -> &'static AliasTable {
    &TERM_ADJUSTMENT
}

// ============================================================================
// Application
// ============================================================================

/// A US patent application file wrapper
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UsApplication {
    /// Application number, digits only
    pub appl_id: String,
    /// Filed under first-inventor-to-file
    pub aia_indicator: Option<bool>,
    /// Filing date
    pub app_filing_date: Option<NaiveDate>,
    /// Effective filing date
    pub effective_filing_date: Option<NaiveDate>,
    /// `UTL`, `DES`, `PLT`, ...
    pub app_type_code: Option<String>,
    /// Entered the US national stage from a PCT filing
    pub national_stage_indicator: Option<bool>,
    /// Invention title
    pub invention_title: Option<String>,
    /// Status in words
    pub app_status: Option<String>,
    /// App status code
    pub app_status_code: Option<i64>,
    /// App status date
    pub app_status_date: Option<NaiveDate>,
    /// Correspondence customer number
    pub customer_number: Option<i64>,
    /// Group art unit
    pub group_art_unit: Option<String>,
    /// Examiner name
    pub examiner_name: Option<String>,
    /// Confirmation number
    pub app_conf_num: Option<i64>,
    /// Attorney docket number
    pub atty_docket_num: Option<String>,
    /// First inventor name
    pub first_inventor_name: Option<String>,
    /// First applicant name
    pub first_applicant_name: Option<String>,
    /// CPC symbols in provider order
    pub cpc_classifications: Vec<String>,
    /// US class/subclass
    pub cls_sub_cls: Option<String>,
    /// Undiscounted, small or micro entity
    pub entity_status: Option<String>,
    /// Earliest pre-grant publication number
    pub app_early_pub_number: Option<String>,
    /// App early pub date
    pub app_early_pub_date: Option<NaiveDate>,
    /// Patent number once granted
    pub patent_number: Option<String>,
    /// Patent issue date
    pub patent_issue_date: Option<NaiveDate>,
    /// Inventors
    pub inventors: Vec<Inventor>,
    /// Applicants
    pub applicants: Vec<Applicant>,
    /// Correspondence address
    pub correspondence_address: Vec<Address>,
    /// Recorded assignments
    pub assignments: Vec<ApplicationAssignment>,
    /// Attorney or agent of record
    pub attorneys: Option<CustomerNumber>,
    /// Foreign priorities
    pub foreign_priorities: Vec<ForeignPriority>,
    /// File wrapper transaction history
    pub transactions: Vec<Transaction>,
    /// Parent applications
    pub parent_applications: Vec<Relationship>,
    /// Child applications
    pub child_applications: Vec<Relationship>,
    /// Absent until the office computes one
    pub patent_term_adjustment: Option<TermAdjustment>,
}

static US_APPLICATION: Lazy<AliasTable> = Lazy::new(|| {
    AliasTable::builder("UsApplication")
        .required("appl_id", "applicationNumberText", FieldKind::Str)
        .field(
            "aia_indicator",
            "applicationMetaData.firstInventorToFileIndicator",
            FieldKind::yes_no(),
        )
        .field("app_filing_date", "applicationMetaData.filingDate", FieldKind::Date)
        .field(
            "effective_filing_date",
            "applicationMetaData.effectiveFilingDate",
            FieldKind::Date,
        )
        .field("app_type_code", "applicationMetaData.applicationTypeCode", FieldKind::Str)
        .field(
            "national_stage_indicator",
            "applicationMetaData.nationalStageIndicator",
            FieldKind::yes_no(),
        )
        .field("invention_title", "applicationMetaData.inventionTitle", FieldKind::Str)
        .field(
            "app_status",
            "applicationMetaData.applicationStatusDescriptionText",
            FieldKind::Str,
        )
        .field(
            "app_status_code",
            "applicationMetaData.applicationStatusCode",
            FieldKind::Int,
        )
        .field(
            "app_status_date",
            "applicationMetaData.applicationStatusDate",
            FieldKind::Date,
        )
        .field("customer_number", "applicationMetaData.customerNumber", FieldKind::Int)
        .field("group_art_unit", "applicationMetaData.groupArtUnitNumber", FieldKind::Str)
        .field("examiner_name", "applicationMetaData.examinerNameText", FieldKind::Str)
        .field(
            "app_conf_num",
            "applicationMetaData.applicationConfirmationNumber",
            FieldKind::Int,
        )
        .field("atty_docket_num", "applicationMetaData.docketNumber", FieldKind::Str)
        .field(
            "first_inventor_name",
            "applicationMetaData.firstInventorName",
            FieldKind::Str,
        )
        .field(
            "first_applicant_name",
            "applicationMetaData.firstApplicantName",
            FieldKind::Str,
        )
        .field(
            "cpc_classifications",
            "applicationMetaData.cpcClassificationBag",
            FieldKind::repeated(FieldKind::Str),
        )
        .field("cls_sub_cls", "applicationMetaData.class/subclass", FieldKind::Str)
        .field(
            "entity_status",
            "applicationMetaData.entityStatusData.businessEntityStatusCategory",
            FieldKind::Str,
        )
        .field(
            "app_early_pub_number",
            "applicationMetaData.earliestPublicationNumber",
            FieldKind::Str,
        )
        .field(
            "app_early_pub_date",
            "applicationMetaData.earliestPublicationDate",
            FieldKind::Date,
        )
        .field("patent_number", "applicationMetaData.patentNumber", FieldKind::Str)
        .field("patent_issue_date", "applicationMetaData.grantDate", FieldKind::Date)
        .field(
            "inventors",
            "applicationMetaData.inventorBag",
            FieldKind::records(inventor),
        )
        .field(
            "applicants",
            "applicationMetaData.applicantBag",
            FieldKind::records(applicant),
        )
        .field(
            "correspondence_address",
            "correspondenceAddressBag",
            FieldKind::records(address),
        )
        .field(
            "assignments",
            "assignmentBag",
            FieldKind::records(application_assignment),
        )
        .field(
            "attorneys",
            "recordAttorney",
            FieldKind::Nested(customer_number),
        )
        .field(
            "foreign_priorities",
            "foreignPriorityBag",
            FieldKind::records(foreign_priority),
        )
        .field(
            "transactions",
            "transactionContentBag",
            FieldKind::records(transaction),
        )
        .field(
            "parent_applications",
            "parentContinuityBag",
            FieldKind::records(relationship),
        )
        .field(
            "child_applications",
            "childContinuityBag",
            FieldKind::records(relationship),
        )
        .field(
            "patent_term_adjustment",
            "patentTermAdjustmentData",
            FieldKind::Nested(term_adjustment),
        )
        .build()
});

impl Model for UsApplication {
    const NAME: &'static str = "UsApplication";

    fn alias_table() -> &'static AliasTable {
        &US_APPLICATION
    }
}

// ============================================================================
// Documents
// ============================================================================

/// One downloadable rendition of a document
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DownloadOption {
    /// `PDF`, `XML` or `MS_WORD`
    pub mime_type_identifier: Option<String>,
    /// Download url
    pub download_url: Option<String>,
    /// Page count
    pub pages: Option<i64>,
}

static DOWNLOAD_OPTION: Lazy<AliasTable> = Lazy::new(|| {
    AliasTable::builder("DownloadOption")
        .field("mime_type_identifier", "mimeTypeIdentifier", FieldKind::Str)
        .field("download_url", "downloadUrl", FieldKind::Str)
        .field("pages", "pageTotalQuantity", FieldKind::Int)
        .build()
});

fn download_option() -> &'static AliasTable {
    &DOWNLOAD_OPTION
}

/// A document in an application's file wrapper
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Document {
    /// Application the document belongs to
    pub appl_id: Option<String>,
    /// Official date, with the office's offset
    pub mail_date: Option<DateTime<FixedOffset>>,
    /// Identifier used in download URLs
    pub document_identifier: Option<String>,
    /// Document code, e.g. `CTNF`
    pub document_code: Option<String>,
    /// Document code description
    pub document_code_description: Option<String>,
    /// `INCOMING` or `OUTGOING`
    pub direction_category: Option<String>,
    /// Download options
    pub download_options: Vec<DownloadOption>,
}

impl Document {
    /// Download URL for the rendition with `mime_type` (e.g. `PDF`)
    pub fn download_url(&self, mime_type: &str) -> Option<&str> {
        self.download_options
            .iter()
            .find(|o| o.mime_type_identifier.as_deref() == Some(mime_type))
            .and_then(|o| o.download_url.as_deref())
    }
}

static DOCUMENT: Lazy<AliasTable> = Lazy::new(|| {
    AliasTable::builder("Document")
        .field("appl_id", "applicationNumberText", FieldKind::Str)
        .field("mail_date", "officialDate", FieldKind::DateTime)
        .field("document_identifier", "documentIdentifier", FieldKind::Str)
        .field("document_code", "documentCode", FieldKind::Str)
        .field(
            "document_code_description",
            "documentCodeDescriptionText",
            FieldKind::Str,
        )
        .field("direction_category", "directionCategory", FieldKind::Str)
        .field(
            "download_options",
            "downloadOptionBag",
            FieldKind::records(download_option),
        )
        .build()
});

impl Model for Document {
    const NAME: &'static str = "Document";

    fn alias_table() -> &'static AliasTable {
        &DOCUMENT
    }
}
