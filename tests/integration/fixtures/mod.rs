// Test fixtures with known commentary documents and expected outputs
// WHY: Golden-file testing requires deterministic input/output pairs for validation

#![allow(dead_code)]

/// Commentary with a plain citation, a comma-split pair, a non-citing verse and a
/// pair without break point
pub const RAGHUVANSHAM_SOURCE: &str = r#"{
  "title": "रघुवंशम्",
  "data": [
    {
      "c": "1",
      "n": "1",
      "v": "वागर्थाविव सम्पृक्तौ वागर्थप्रतिपत्तये। जगतः पितरौ वन्दे पार्वतीपरमेश्वरौ॥",
      "mn": "माता च पिता च पितरौ, `पिता मात्रा` (पा.1।2।70) इति द्वन्द्वैकशेषः। जगतः पितरौ इति।"
    },
    {
      "c": "1",
      "n": "2",
      "v": "क्व सूर्यप्रभवो वंशः क्व चाल्पविषया मतिः।",
      "mn": "अत्र न किमपि सूत्रम्।"
    },
    {
      "c": "1",
      "n": "3",
      "v": "रघूणामन्वयं वक्ष्ये तनुवाग्विभवोऽपि सन्।",
      "mn": "रघूणाम् अपत्यानि रघवः। `तस्यापत्यम्` (पा.4।1।92) इच्यण्, `टिङ्ढाणञ्-` (पा.4।1।15)इत्यादिना ङीप्।"
    },
    {
      "c": 2,
      "n": 1,
      "v": "पितरौ प्रणम्य।",
      "mn": "`पिता मात्रा` (पा.1।2।70) और (पा.2।3।80) इति।"
    }
  ]
}"#;

/// Expected sutra sentences for RAGHUVANSHAM_SOURCE
/// Format: index<TAB>loc<TAB>sutra<TAB>sentence
pub const RAGHUVANSHAM_EXPECTED: &str = "0\t1.1\t1.2.70\tमाता च पिता च पितरौ, `पिता मात्रा` इति द्वन्द्वैकशेषः।
1\t1.3\t4.1.92\t`तस्यापत्यम्` इच्यण्,
2\t1.3\t4.1.15\t`टिङ्ढाणञ्-` इत्यादिना ङीप्।
3\t2.1\t1.2.70\t`पिता मात्रा` और इति।
4\t2.1\t2.3.80\t`पिता मात्रा` और इति।";

/// Citation at offset zero and a citation directly before a delimiter
pub const KUMARASAMBHAVAM_SOURCE: &str = r#"{
  "title": "कुमारसम्भवम्",
  "data": [
    {
      "c": "1",
      "n": "1",
      "v": "अस्त्युत्तरस्यां दिशि देवतात्मा हिमालयो नाम नगाधिराजः।",
      "mn": "(पा.1।2।70) `पिता मात्रा` इति एकशेषः। हिमालयो नाम (पा.3।3।19)।"
    }
  ]
}"#;

pub const KUMARASAMBHAVAM_EXPECTED: &str = "0\t1.1\t1.2.70\t`पिता मात्रा` इति एकशेषः।
1\t1.1\t3.3.19\tहिमालयो नाम ।";

/// Commentary containing only malformed notations
pub const MALFORMED_SOURCE: &str = r#"{
  "title": "दोषाः",
  "data": [
    { "c": "1", "n": "1", "v": "", "mn": "(पा.1।2) इति। (पा.1।2।3।4) च।" }
  ]
}"#;
