//! Field catalog published by the 835 parser.
//!
//! Internal field name → display name, for every field the parser can emit.
//! The store pre-creates a column for both spellings so first-file ingest
//! does not pay for hundreds of online `ALTER TABLE` statements.

/// Identity fields, in uid order: ISA13, TRN02, CLP07, claim status, sequence.
pub const IDENTITY_FIELDS: [&str; 5] = [
    INTERCHANGE_CONTROL_NUMBER,
    TRACE_NUMBER,
    PAYER_CLAIM_CONTROL_NUMBER,
    CLAIM_STATUS,
    SEQUENCE,
];

pub const INTERCHANGE_CONTROL_NUMBER: &str = "ENV_InterchangeControlNumber_Envelope_ISA";
pub const TRACE_NUMBER: &str = "CHK_TraceNumber_Header_TRN";
pub const PAYER_CLAIM_CONTROL_NUMBER: &str = "CLM_PayerControlNumber_L2100_CLP";
pub const CLAIM_STATUS: &str = "CLM_Status_L2100_CLP";
pub const SEQUENCE: &str = "SEQ";

/// High-value query fields that get a secondary index once data exists.
pub const INDEXED_FIELDS: [&str; 11] = [
    "RUN",
    "Filename_File",
    "Effective_PayerName",
    "Provider_Name_L1000B_N1",
    "CLM_PatientControlNumber_L2100_CLP",
    PAYER_CLAIM_CONTROL_NUMBER,
    CLAIM_STATUS,
    "SVC_ServiceStartDate_L2110_DTM",
    "CLM_ServiceStartDate_L2100_DTM",
    TRACE_NUMBER,
    INTERCHANGE_CONTROL_NUMBER,
];

pub const FIELD_CATALOG: &[(&str, &str)] = &[
    ("Payer_Name_L1000A_N1", "PAYOR PAID"),
    ("Payer_Address_L1000A_N3", "PAYOR ADDRESS"),
    ("Payer_Address2_L1000A_N3", "PAYOR ADDRESS 2"),
    ("Payer_City_L1000A_N4", "PAYOR CITY"),
    ("Payer_State_L1000A_N4", "PAYOR STATE"),
    ("Payer_Zip_L1000A_N4", "PAYOR ZIP"),
    ("Provider_Name_L1000B_N1", "COMPANY"),
    ("CLM_Occurrence_L2100_CLP", "CLAIM OCCURRENCE"),
    ("CLM_StatusDescr_L2100_CLP", "IS PRIMARY"),
    ("CLM_FilingIndicatorDesc_L2100_CLP", "FILING INDICATOR"),
    ("CLM_ChargeAmount_L2100_CLP", "CLAIM CHARGE"),
    ("CLM_PaymentAmount_L2100_CLP", "CLAIM PAYMENT"),
    ("CLM_PatientResponsibility_L2100_CLP", "CLAIM PATIENT RESPONSIBILITY"),
    ("CLM_IsReversal_L2100_CLP", "IS REVERSAL"),
    ("CLM_Contractual_L2100_CAS", "CALCULATED CLAIM CONTRACTUAL"),
    ("CLM_Copay_L2100_CAS", "CALCULATED CLAIM COPAY"),
    ("CLM_Coinsurance_L2100_CAS", "CALCULATED CLAIM COINSURANCE"),
    ("CLM_Deductible_L2100_CAS", "CALCULATED CLAIM DEDUCTIBLE"),
    ("CLM_Denied_L2100_CAS", "CALCULATED CLAIM DENIED"),
    ("CLM_OtherAdjustments_L2100_CAS", "CALCULATED CLAIM OTHER ADJUSTMENTS"),
    ("CLM_Sequestration_L2100_CAS", "CALCULATED CLAIM SEQUESTRATION"),
    ("CLM_COB_L2100_CAS", "CALCULATED CLAIM COB"),
    ("CLM_HCRA_L2100_CAS", "CALCULATED CLAIM HCRA"),
    ("CLM_QMB_L2100_CAS", "CALCULATED CLAIM QMB"),
    ("CLM_AuditFlag_L2100_CAS", "CLAIM ADJUSTMENT AUDIT FLAG"),
    ("CLM_InterestAmount_L2100_AMT", "CLAIM INTEREST"),
    ("CLM_CoverageAmount_L2100_AMT", "CLAIM COVERAGE"),
    ("CLM_PatientAmountPaid_L2100_AMT", "CLAIM PATIENT PAID"),
    ("CLM_DiscountAmount_L2100_AMT", "CLAIM DISCOUNT"),
    ("CLM_MemberID_L2100_NM1", "MEMBER ID"),
    ("CLM_SubscriberName_L2100_NM1", "SUSCRIBER NAME"),
    ("CLM_PatientName_L2100_NM1", "NAME"),
    ("CLM_SSN_L2100_NM1", "SSN"),
    ("CLM_CorrectedInsuredName_L2100_NM1", "NAME CORRECTIONS"),
    ("CLM_CorrectedInsuredID_L2100_NM1", "MEMBER ID CORRECTIONS"),
    ("CLM_PriorAuth_L2100_REF", "AUTH"),
    ("CLM_OriginalRef_L2100_REF", "ORIGINAL REFERENCE NUMBER"),
    ("CLM_GroupNumber_L2100_REF", "MEMBER GROUP ID"),
    ("CLM_PlanName_L2100_REF", "MEMBER PLAN ID"),
    ("CLM_RepricedClaimRefNumber_L2100_REF", "CLAIM REPRICED CLAIM REF"),
    ("CLM_RepricedLineItemRefNumber_L2100_REF", "CLAIM REPRICED LINE ITEM REF"),
    ("CLM_AmbulatoryPaymentClassification_L2100_REF", "CLAIM APC"),
    ("CLM_NAICCode_L2100_REF", "CLAIM NAIC CODE"),
    ("CLM_ServiceStartDate_L2100_DTM", "DATE OF SERVICE"),
    ("CLM_HealthcareRemarkCodes_L2100_LQ", "CLAIM HEALTHCARE REMARK CODES"),
    ("CLM_HealthcareRemarkDescriptions_L2100_LQ", "CLAIM HEALTHCARE REMARK DESCRIPTIONS"),
    ("CLM_CoveredActual_L2100_QTY", "CLAIM COVERED ACTUAL"),
    ("CHK_ProductionDate_Header_DTM405", "PRODUCTION DATE"),
    ("SVC_ProcedureCode_L2110_SVC", "HCPCS"),
    ("SVC_CodeDescription_L2110_SVC", "HCPCS DESCRIPTION"),
    ("SVC_ServiceLevel_L2110_SVC", "HCPCS TYPE"),
    ("SVC_Modifier1_L2110_SVC", "MODIFIERS 1"),
    ("SVC_Modifier2_L2110_SVC", "MODIFIERS 2"),
    ("SVC_Modifiers_L2110_SVC", "MODIFIERS"),
    ("SVC_ModifierDescriptions_L2110_SVC", "MODIFIERS DESCRIPTION"),
    ("SVC_ChargeAmount_L2110_SVC", "SERVICE CHARGE"),
    ("SVC_PaymentAmount_L2110_SVC", "SERVICE PAYMENT"),
    ("SVC_Units_L2110_SVC", "SERVICE UNITS"),
    ("SVC_Contractual_L2110_CAS", "CALCULATED CONTRACTUAL"),
    ("SVC_Copay_L2110_CAS", "CALCULATED COPAY"),
    ("SVC_Coinsurance_L2110_CAS", "CALCULATED COINSURANCE"),
    ("SVC_Deductible_L2110_CAS", "CALCULATED DEDUCTIBLE"),
    ("SVC_Denied_L2110_CAS", "CALCULATED DENIED"),
    ("SVC_OtherAdjustments_L2110_CAS", "CALCULATED OTHER ADJUSTMENTS"),
    ("SVC_Sequestration_L2110_CAS", "CALCULATED SEQUESTRATION"),
    ("SVC_COB_L2110_CAS", "CALCULATED COB"),
    ("SVC_HCRA_L2110_CAS", "CALCULATED HCRA"),
    ("SVC_QMB_L2110_CAS", "CALCULATED QMB"),
    ("SVC_AuditFlag_L2110_CAS", "ADJUSTMENT AUDIT FLAG"),
    ("SVC_Adjustments_L2110_CAS", "SERVICE ADJUSTMENTS RAW"),
    ("SVC_ServiceStartDate_L2110_DTM", "SERVICE DATE"),
    ("SVC_RemarkCodes_L2110_LQ", "SERVICE REMARK CODES"),
    ("SVC_RemarkDescriptions_L2110_LQ", "SERVICE REMARK DESCRIPTIONS"),
    ("SVC_HealthcareRemarkCodes_L2110_LQ", "SERVICE HEALTHCARE REMARK CODES"),
    ("SVC_HealthcareRemarkDescriptions_L2110_LQ", "SERVICE HEALTHCARE REMARK DESCRIPTIONS"),
    ("SVC_AllowedAmount_L2110_AMT", "SERVICE ALLOWED AMOUNT"),
    ("SVC_CoveredActual_L2110_QTY", "SERVICE COVERED ACTUAL"),
    ("SVC_RepricedClaimRefNumber_L2110_REF", "SERVICE REPRICED CLAIM REF"),
    ("SVC_RepricedLineItemRefNumber_L2110_REF", "SERVICE REPRICED LINE ITEM REF"),
    ("SVC_AmbulatoryPaymentClassification_L2110_REF", "SERVICE APC"),
    ("SVC_NAICCode_L2110_REF", "SERVICE NAIC CODE"),
    ("Patient_NonCovered", "CALCULATED PATIENT NON COVERED"),
    ("Patient_OtherResp", "CALCULATED PATIENT OTHER"),
    ("Allowed_Amount", "CALCULATED ALLOWED 1"),
    ("Allowed_Verification", "CALCULATED ALLOWED 2"),
    ("EDI_MileageUnitPrice", "SERVICE MILEAGE UNIT PRICE"),
    ("FH_PickupZIP", "PICK UP ZIP"),
    ("FH_OutOfNetwork", "OUT OF NETWORK"),
    ("FH_InNetwork", "IN NETWORK"),
    ("FH_OON_UnitPrice", "ONUP"),
    ("FH_IN_UnitPrice", "INUP"),
    ("FH_OON_Miles", "OUT OF NETWORK MILES"),
    ("FH_IN_Miles", "IN NETWORK MILES"),
    ("FH_OON_Final", "OUT OF NETWORK FINAL"),
    ("FH_IN_Final", "IN NETWORK FINAL"),
    ("FH_EffectiveUnits", "FAIR HEALTH UNITS USED"),
];

/// Every name the parser may emit: internal names first, then display names.
pub fn all_field_names() -> impl Iterator<Item = &'static str> {
    FIELD_CATALOG
        .iter()
        .map(|(internal, _)| *internal)
        .chain(FIELD_CATALOG.iter().map(|(_, display)| *display))
}

/// Display name for an internal field, if the parser renames it.
pub fn display_name(internal: &str) -> Option<&'static str> {
    FIELD_CATALOG
        .iter()
        .find(|(name, _)| *name == internal)
        .map(|(_, display)| *display)
}
