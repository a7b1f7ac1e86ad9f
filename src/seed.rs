use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::tally::{try_each, Tally};
use crate::uploader::ApiClient;

const PATIENT_NAMES: &[&str] = &[
    "Rahim Uddin",
    "Fatima Begum",
    "Abdul Karim",
    "Nasreen Akter",
    "Kamal Hossain",
    "Ayesha Siddiqua",
    "Rafiqul Islam",
    "Tasnim Jara",
    "Sultana Razia",
    "Jamal Uddin",
    "Bilquis Banu",
    "Farid Ahmed",
    "Salma Khatun",
    "Moklesur Rahman",
    "Jahanara Imam",
];
const LOCATIONS: &[&str] = &[
    "Dhaka", "Chittagong", "Sylhet", "Rajshahi", "Khulna", "Barisal", "Rangpur", "Mymensingh",
];
const CANCER_TYPES: &[&str] = &[
    "Leukemia", "Lymphoma", "Breast Cancer", "Lung Cancer", "Osteosarcoma", "Brain Tumor",
];
const DONOR_NAMES: &[&str] = &["Anonymous", "John Doe", "Jane Smith", ""];
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// One dummy patient per image in the content directory, posted with
/// the image as its photo.
pub async fn seed_patients(
    client: &ApiClient,
    token: &str,
    images_dir: &Path,
) -> Result<Tally> {
    let images = list_images(images_dir)?;
    println!("Found {} images in {}", images.len(), images_dir.display());

    let mut rng = fastrand::Rng::new();
    let patients: Vec<(String, Vec<(String, String)>, PathBuf)> = images
        .iter()
        .enumerate()
        .map(|(index, filename)| {
            let fields = patient_fields(index, &mut rng);
            let name = fields[0].1.clone();
            (name, fields, images_dir.join(filename))
        })
        .collect();

    let tally = try_each(
        patients,
        |(name, _, _)| name.clone(),
        |(name, fields, path)| async move {
            println!("Uploading {} with image {}...", name, path.display());
            let bytes = tokio::fs::read(&path).await?;
            let filename = path
                .file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_default();
            client
                .post_form("/admin/patients", token, fields, Some((filename, bytes)))
                .await
        },
    )
    .await;
    Ok(tally)
}

/// Field set the patients endpoint expects, with randomized dummy data.
fn patient_fields(index: usize, rng: &mut fastrand::Rng) -> Vec<(String, String)> {
    let name = format!(
        "{} ({})",
        PATIENT_NAMES[index % PATIENT_NAMES.len()],
        index + 1
    );
    vec![
        ("name_en".to_string(), name.clone()),
        ("name_bn".to_string(), format!("রোগী {}", index + 1)),
        ("code".to_string(), format!("PT-{}", 1000 + index)),
        ("age".to_string(), rng.u32(5..=70).to_string()),
        (
            "phone".to_string(),
            format!("017{}", rng.u32(10_000_000..=99_999_999)),
        ),
        ("email".to_string(), format!("patient{}@example.com", index)),
        (
            "donor_name".to_string(),
            DONOR_NAMES[rng.usize(..DONOR_NAMES.len())].to_string(),
        ),
        (
            "location".to_string(),
            LOCATIONS[rng.usize(..LOCATIONS.len())].to_string(),
        ),
        (
            "cancer_type".to_string(),
            CANCER_TYPES[rng.usize(..CANCER_TYPES.len())].to_string(),
        ),
        (
            "treatment_cost_required".to_string(),
            rng.u32(50_000..=500_000).to_string(),
        ),
        ("fund_raised".to_string(), rng.u32(0..=40_000).to_string()),
        (
            "medical_summary_en".to_string(),
            format!(
                "This is a dummy medical summary for {}. Patient requires urgent chemotherapy and radiation therapy.",
                name
            ),
        ),
        (
            "medical_summary_bn".to_string(),
            "এটি একটি নমুনা মেডিকেল সারাংশ। রোগীর জরুরি কেমোথেরাপি প্রয়োজন।".to_string(),
        ),
        ("is_active".to_string(), "1".to_string()),
        // Feature the first few so the landing page has content.
        (
            "is_featured".to_string(),
            if index < 3 { "1" } else { "0" }.to_string(),
        ),
    ]
}

/// Image files in the content directory, sorted by name so repeat runs
/// assign the same dummy identities.
fn list_images(dir: &Path) -> Result<Vec<String>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Directory {} not found", dir.display()))?;
    let mut images: Vec<String> = entries
        .filter_map(|e| e.ok())
        .filter_map(|e| e.file_name().into_string().ok())
        .filter(|name| {
            Path::new(name)
                .extension()
                .map(|ext| {
                    let ext = ext.to_string_lossy().to_lowercase();
                    IMAGE_EXTENSIONS.contains(&ext.as_str())
                })
                .unwrap_or(false)
        })
        .collect();
    images.sort();
    Ok(images)
}

struct Story {
    title_en: &'static str,
    subject_name_en: &'static str,
    kind: &'static str,
    excerpt_en: &'static str,
    content_en: &'static str,
    featured_image: &'static str,
}

const STORIES: &[Story] = &[
    Story {
        title_en: "Fighting Back: Rubina's Journey",
        subject_name_en: "Rubina Akter",
        kind: "survivor",
        excerpt_en: "A mother of two who battled breast cancer with resilience and the support of BANCAT.",
        content_en: "Rubina was diagnosed with stage 2 breast cancer in 2023. Devastated but determined, she approached BANCAT for guidance. Through our patient navigation program, she connected with the right oncologists and received financial aid for her chemotherapy. Today, she is cancer-free and advocates for early detection in her community.",
        featured_image: "https://placehold.co/600x400?text=Rubina+Akter",
    },
    Story {
        title_en: "A Second Chance at Life",
        subject_name_en: "Rahim Uddin",
        kind: "survivor",
        excerpt_en: "Beating lymphoma against all odds, Rahim is now back to supporting his family.",
        content_en: "Rahim, a day laborer, thought his life was over when he was diagnosed with lymphoma. The high cost of treatment was impossible for him. BANCAT stepped in to cover his medication costs. After six months of rigorous treatment, Rahim is in remission and has returned to work, grateful for the second chance.",
        featured_image: "https://placehold.co/600x400?text=Rahim+Uddin",
    },
    Story {
        title_en: "BANCAT Saved My Father",
        subject_name_en: "Salma Begum",
        kind: "testimonial",
        excerpt_en: "A daughter's gratitude for the timely support that saved her father.",
        content_en: "My father needed urgent surgery, and we had no funds left. BANCAT's emergency fund was a lifesaver. They didn't just give us money; they gave us hope. The staff treated us with such dignity and care. I will forever be indebted to this organization.",
        featured_image: "https://placehold.co/600x400?text=Salma+Begum",
    },
    Story {
        title_en: "More Than Just Financial Aid",
        subject_name_en: "Kamal Hossain",
        kind: "testimonial",
        excerpt_en: "Kamal highlights the counseling and mental health support provided by BANCAT.",
        content_en: "Cancer breaks you mentally more than physically. The counseling sessions at BANCAT helped me stay strong for my children. The financial aid was crucial, but the emotional support was what kept me going.",
        featured_image: "https://placehold.co/600x400?text=Kamal+Hossain",
    },
    Story {
        title_en: "Walking the Path Together",
        subject_name_en: "Anisur Rahman",
        kind: "caregiver",
        excerpt_en: "A husband's unwavering support for his wife through her cancer battle.",
        content_en: "Watching my wife suffer was the hardest thing I've ever done. BANCAT's caregiver workshops taught me how to care for her properly at home and manage her medication. It also gave me a space to share my own stress. We are in this together, and BANCAT is part of our family now.",
        featured_image: "https://placehold.co/600x400?text=Anisur+Rahman",
    },
    Story {
        title_en: "A Mother's Strength",
        subject_name_en: "Jahanara Bibi",
        kind: "caregiver",
        excerpt_en: "Caring for her son with leukemia, Jahanara is a pillar of strength.",
        content_en: "My son is only 12. It's heartbreaking. But the doctors at BANCAT told me to be strong for him. They helped us with accommodation near the hospital so I didn't have to travel daily. That support allowed me to be by his side every moment.",
        featured_image: "https://placehold.co/600x400?text=Jahanara+Bibi",
    },
    Story {
        title_en: "Giving Back to the Community",
        subject_name_en: "Tanvir Hasan",
        kind: "volunteer",
        excerpt_en: "University student Tanvir dedicates his weekends to helping cancer patients.",
        content_en: "I started volunteering at BANCAT for a college credit, but I stayed for the cause. Organizing blood donation drives and spending time with children in the palliative care unit has changed my perspective on life. Everyone should volunteer here.",
        featured_image: "https://placehold.co/600x400?text=Tanvir+Hasan",
    },
    Story {
        title_en: "Driving Change",
        subject_name_en: "Nasreen Sultana",
        kind: "volunteer",
        excerpt_en: "A corporate professional using her skills to fundraise for BANCAT.",
        content_en: "I use my network to raise funds for BANCAT's 'Zakat for Life' campaign. It's fulfilling to see how corporate social responsibility can directly save lives. BANCAT's transparency makes it easy for me to convince donors.",
        featured_image: "https://placehold.co/600x400?text=Nasreen+Sultana",
    },
];

fn story_body(story: &Story) -> serde_json::Value {
    serde_json::json!({
        "title_en": story.title_en,
        "title_bn": "",
        "subject_name_en": story.subject_name_en,
        "subject_name_bn": "",
        "type": story.kind,
        "content_en": story.content_en,
        "content_bn": "",
        "excerpt_en": story.excerpt_en,
        "excerpt_bn": "",
        "featured_image": story.featured_image,
        "video_url": "",
        "is_published": 1,
    })
}

pub async fn seed_stories(client: &ApiClient, token: &str) -> Tally {
    println!("Starting upload of {} stories...", STORIES.len());
    try_each(
        STORIES.iter(),
        |s| s.title_en.to_string(),
        |s| {
            let body = story_body(s);
            async move { client.post_json("/admin/stories", token, &body).await }
        },
    )
    .await
}

struct Testimonial {
    name: &'static str,
    role: &'static str,
    quote: &'static str,
}

const TESTIMONIALS: &[Testimonial] = &[
    Testimonial {
        name: "Sarah Ahmed",
        role: "Cancer Survivor",
        quote: "The support I received from BANCAT was truly life-changing. They helped me navigate the complexities of treatment with dignity and hope.",
    },
    Testimonial {
        name: "Dr. Ayesha Rahim",
        role: "Oncologist",
        quote: "Seeing the impact of BANCAT's financial aid on my patients is heartwarming. It removes a huge burden, allowing them to focus on recovery.",
    },
    Testimonial {
        name: "Ali Khan",
        role: "Volunteer",
        quote: "Volunteering with BANCAT has shown me the power of community. Every small effort contributes to saving a life.",
    },
    Testimonial {
        name: "Fatima Z.",
        role: "Patient Family Member",
        quote: "When we lost hope due to the high costs of medication, BANCAT stepped in. We are forever grateful for their kindness.",
    },
    Testimonial {
        name: "Kamran Beg",
        role: "Regular Donor",
        quote: "I donate to BANCAT because I trust their transparency and see the tangible difference they make in people's lives.",
    },
];

pub async fn seed_testimonials(client: &ApiClient, token: &str) -> Tally {
    println!("Seeding {} testimonials...", TESTIMONIALS.len());
    try_each(
        TESTIMONIALS.iter(),
        |t| t.name.to_string(),
        |t| {
            let body = serde_json::json!({
                "name": t.name,
                "role": t.role,
                "quote": t.quote,
            });
            async move { client.post_json("/admin/testimonials", token, &body).await }
        },
    )
    .await
}

// ── Tests ──
