//! Prompt construction for extraction and chat calls
//!
//! The prompt text is part of the external contract with the completion
//! service: the taxonomy block and the JSON schema example define the
//! vocabulary and shape the model is expected to return. Keep wording
//! changes deliberate.

use pragati_domain::taxonomy;

/// Build the extraction prompt for one chunk.
///
/// With more than one chunk the prompt states which window this is and
/// instructs the model to extract only what is present in it; the
/// cross-chunk merger reconciles the partial results afterwards.
pub fn build_extraction_prompt(
    chunk_text: &str,
    district_name: &str,
    upload_date: &str,
    chunk_num: usize,
    total_chunks: usize,
) -> String {
    let is_chunk = total_chunks > 1;

    let chunk_info = if is_chunk {
        format!(
            "\n\nIMPORTANT: This is chunk {chunk_num} of {total_chunks} from a large document.\n\
             - Extract all relevant information from THIS chunk only.\n\
             - Focus on finding any sectors, sub-categories, and action_points mentioned in this portion of the document.\n\
             - The results from all chunks will be merged together, so extract everything you find in this chunk."
        )
    } else {
        String::new()
    };

    let chunk_rule = if is_chunk {
        "\n- Extract ALL relevant information from this chunk, even if it seems incomplete. The chunks will be merged."
    } else {
        ""
    };

    format!(
        r#"You are an AI model that extracts structured and factual information
from government documents related to schemes in Arunachal Pradesh.{chunk_info}

CRITICAL EXTRACTION REQUIREMENTS:
1. ACTION NAMES: Use ONLY the exact predefined subcategory names listed below as action_name. DO NOT create custom action names.
2. COMPREHENSIVE EXTRACTION: Extract EVERY piece of information available in the document for each subcategory. Nothing should be missed.
3. LOGICAL STATUS: For each action point, analyze the content and infer a logical current_status based on the information found (e.g., "In Progress", "Completed", "Pending", "On Track", "Delayed", etc.)
4. DATA FIDELITY: Only extract information that is explicitly present in the document. Do not infer or add data that is not in the document, but ensure ALL information in the document is captured.
5. NO DATA LOSS: Every number, percentage, status, date, target, achievement, description, statistic, note, or any other piece of information mentioned for a subcategory must be captured.

Analyze the document text and organize data according to this exact JSON schema:

{{
  "district": "{district_name}",
  "upload_date": "{upload_date}",
  "sectors": [
    {{
      "sector_name": "Sashakt Labharthi: Saturation Of Flagship Schemes",
      "sub_categories": [
        {{
          "sub_category_name": "Identification and Saturation of Beneficiaries",
          "information": {{
            "action_points": [
              {{
                "action_name": "Identification and Saturation of Beneficiaries",
                "current_status": "Inferred from document content - e.g., 'In Progress', 'Completed', 'On Track', etc.",
                "achievement_percentage": "number or null - extract from document",
                "data_source": "text or null - extract from document",
                "remarks": "text or null - any additional notes from document"
              }}
            ],
            "additional_details": {{
              "target_beneficiaries": "extract all available data",
              "current_coverage": "extract all available data",
              "any_other_information": "extract ALL available data - nothing should be missed"
            }}
          }}
        }}
      ]
    }}
  ]
}}

Rules:
- ACTION NAME MUST BE EXACT SUBCATEGORY NAME: For each subcategory, create exactly ONE action point where action_name is the EXACT subcategory name from the predefined list below.
- EXTRACT EVERYTHING: Capture ALL information available in the document for each subcategory:
  * All numbers, percentages, targets, achievements
  * All status information, dates, timelines
  * All descriptions, statistics, notes, observations
  * All any other data mentioned related to that subcategory
- LOGICAL STATUS INFERENCE: Analyze the content for each subcategory and infer a meaningful current_status (e.g., "Completed", "In Progress", "Pending", "On Track", "Delayed", "Under Review", etc.) based on the actual content in the document.
- ADDITIONAL_DETAILS: Put ALL extracted information (beyond action_point fields) into additional_details with descriptive keys.
- Use descriptive keys that reflect actual information found (e.g., "total_beneficiaries", "coverage_percentage", "funds_allocated", "implementation_status", "target_value", "achievement_value", "completion_date", etc.)
- DOCUMENT-BOUND: Only extract data explicitly present in the document, but ensure NO data in the document is missed.
- Ensure the district field is "{district_name}" and upload_date is "{upload_date}".
- Categorize content strictly into predefined sectors and sub-categories listed below.
- Only include sectors and sub_categories that have relevant data in the document.{chunk_rule}

Predefined Sectors & Sub-Categories:

{taxonomy_block}

Document Text:
{chunk_text}

Return ONLY valid JSON following the schema above. Do not include any explanatory text before or after the JSON."#,
        taxonomy_block = taxonomy::prompt_block(),
    )
}

/// Build the chat prompt grounding an answer in stored knowledge.
pub fn build_chat_prompt(question: &str, context_data: &str, district_name: &str) -> String {
    format!(
        r#"You are an AI assistant helping users query information about government schemes
in Arunachal Pradesh districts. Answer questions based on the provided context data.

District: {district_name}

Context Data (from database):
{context_data}

User Question: {question}

Instructions:
- Answer the question based only on the provided context data.
- If the context doesn't contain relevant information, politely state that.
- Be conversational and helpful.
- Include specific details, numbers, and facts from the context when available.
- Organize your response clearly with bullet points or short paragraphs as needed.

Provide a helpful and accurate response:"#
    )
}
