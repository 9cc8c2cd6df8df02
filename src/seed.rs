//! Sample legal corpus used to seed an empty knowledge base so a fresh
//! install can answer queries before any upload.

const SEED_DOCUMENTS: [&str; 5] = [
    "According to Section 302 of Indian Penal Code (IPC), whoever commits murder shall be \
     punished with death, or imprisonment for life, and shall also be liable to fine.",
    "Under Section 304A of IPC, whoever causes the death of any person by doing any rash or \
     negligent act not amounting to culpable homicide, shall be punished with imprisonment of \
     either description for a term which may extend to two years, or with fine, or with both.",
    "As per Section 375 of IPC, rape is defined as specific acts against a woman without her \
     consent or will, and is punishable under Section 376 with rigorous imprisonment of either \
     description for a term which shall not be less than ten years, but which may extend to \
     imprisonment for life.",
    "According to Section 420 of IPC, whoever cheats and thereby dishonestly induces the person \
     deceived to deliver any property to any person shall be punished with imprisonment of \
     either description for a term which may extend to seven years, and shall also be liable \
     to fine.",
    "The Right to Information Act, 2005 mandates timely response to citizen requests for \
     government information. It is an initiative taken by Department of Personnel and Training, \
     Ministry of Personnel, Public Grievances and Pensions to provide a RTI Portal Gateway to \
     the citizens for quick search of information.",
];

pub fn seed_documents() -> Vec<String> {
    SEED_DOCUMENTS.iter().map(|doc| doc.to_string()).collect()
}
