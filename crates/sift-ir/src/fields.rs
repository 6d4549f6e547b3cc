//! Canonical field identifiers.
//!
//! Dialect parsers map database-specific field syntax (`.mp.`, `[tiab]`,
//! a trailing `/`) onto these identifiers, and backends map them out again.
//! A keyword never carries a dialect field name.

/// Article title.
pub const TITLE: &str = "title";
/// Abstract body text.
pub const ABSTRACT: &str = "text";
/// Author display names.
pub const AUTHORS: &str = "authors";
/// MeSH headings assigned to the article.
pub const MESH_HEADINGS: &str = "mesh_headings";
/// MeSH subheadings attached to a heading.
pub const MESH_SUBHEADING: &str = "mesh_subheading";
/// Floating (unattached) MeSH subheadings.
pub const FLOATING_MESH_HEADINGS: &str = "floating_mesh_headings";
/// MeSH headings marked as the major focus of the article.
pub const MAJOR_MESH_HEADINGS: &str = "major_mesh_headings";
/// Publication type (randomized controlled trial, review, …).
pub const PUBLICATION_TYPE: &str = "publication_type";
/// Date of publication.
pub const PUBLICATION_DATE: &str = "publication_date";
/// Publication status (in press, epub ahead of print, …).
pub const PUBLICATION_STATUS: &str = "publication_status";
/// Journal name.
pub const JOURNAL: &str = "journal";

// The extended PubMed vocabulary. Only a handful of these appear in typical
// systematic-review strategies, but the PubMed field tables reference all of
// them.

/// Author affiliation.
pub const AFFILIATION: &str = "affiliation";
/// Unfielded search over everything.
pub const ALL_FIELDS: &str = "all_fields";
/// A single author name.
pub const AUTHOR: &str = "author";
/// Corporate author.
pub const AUTHOR_CORPORATE: &str = "author_corporate";
/// First-listed author.
pub const AUTHOR_FIRST: &str = "author_first";
/// Full author name.
pub const AUTHOR_FULL: &str = "author_full";
/// Author identifier (ORCID and similar).
pub const AUTHOR_IDENTIFIER: &str = "author_identifier";
/// Last-listed author.
pub const AUTHOR_LAST: &str = "author_last";
/// Book title.
pub const BOOK: &str = "book";
/// Conflict of interest statements.
pub const CONFLICT_OF_INTEREST_STATEMENTS: &str = "conflict_of_interest_statements";
/// Record completion date.
pub const DATE_COMPLETION: &str = "date_completion";
/// Record creation date.
pub const DATE_CREATE: &str = "date_create";
/// Entrez registration date.
pub const DATE_ENTREZ: &str = "date_entrez";
/// MeSH assignment date.
pub const DATE_MESH: &str = "date_mesh";
/// Record modification date.
pub const DATE_MODIFICATION: &str = "date_modification";
/// Publication date as recorded by the database.
pub const DATE_PUBLICATION: &str = "date_publication";
/// Enzyme Commission or CAS registry number.
pub const EC_RN_NUMBER: &str = "ec_rn_number";
/// Editor name.
pub const EDITOR: &str = "editor";
/// Saved search filter.
pub const FILTER: &str = "filter";
/// Grant number.
pub const GRANT_NUMBER: &str = "grant_number";
/// Book ISBN.
pub const ISBN: &str = "isbn";
/// Investigator name.
pub const INVESTIGATOR: &str = "investigator";
/// Full investigator name.
pub const INVESTIGATOR_FULL: &str = "investigator_full";
/// Journal issue.
pub const ISSUE: &str = "issue";
/// Publication language.
pub const LANGUAGE: &str = "language";
/// Location identifier.
pub const LOCATION_ID: &str = "location_id";
/// MeSH heading restricted to major topic.
pub const MESH_MAJOR_TOPIC: &str = "mesh_major_topic";
/// MeSH terms of any kind.
pub const MESH_TERMS: &str = "mesh_terms";
/// Keywords supplied by the author.
pub const OTHER_TERM: &str = "other_term";
/// Page numbers.
pub const PAGINATION: &str = "pagination";
/// Pharmacological action.
pub const PHARMACOLOGICAL_ACTION: &str = "pharmacological_action";
/// PubMed identifier.
pub const PMID: &str = "pmid";
/// Publisher name.
pub const PUBLISHER: &str = "publisher";
/// Secondary source identifier.
pub const SECONDARY_SOURCE_ID: &str = "secondary_source_id";
/// Personal name as a subject.
pub const SUBJECT_PERSONAL_NAME: &str = "subject_personal_name";
/// Supplementary concept record.
pub const SUPPLEMENTARY_CONCEPT: &str = "supplementary_concept";
/// Free-text words from title, abstract and MeSH.
pub const TEXT_WORD: &str = "text_word";
/// Transliterated (vernacular) title.
pub const TRANSLITERATED_TITLE: &str = "transliterated_title";
/// Journal volume.
pub const VOLUME: &str = "volume";
