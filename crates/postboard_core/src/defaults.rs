//! Default board used to seed an empty store.

use crate::model::grouping::{Grouping, GroupingSet};
use crate::model::post::Platform::{self, Facebook, Instagram, Tiktok};
use crate::model::post::Post;

/// Column new posts land in when the caller names none.
pub const DEFAULT_GROUPING_ID: &str = "idea";

const SAMPLE_IMAGE: &str = "/uploads/sample-banner.png";

const COLUMNS: &[(&str, &str)] = &[
    (DEFAULT_GROUPING_ID, "Idea"),
    ("progress", "In Progress"),
    ("pending", "Pending"),
    ("approved", "Approved"),
    ("closed", "Closed"),
];

struct SamplePost {
    grouping_id: &'static str,
    id: &'static str,
    title: &'static str,
    description: &'static str,
    date: &'static str,
    time: &'static str,
    platforms: &'static [Platform],
    author: &'static str,
    likes: u32,
    notes: &'static str,
}

const SAMPLE_POSTS: &[SamplePost] = &[
    SamplePost {
        grouping_id: "idea",
        id: "post-1",
        title: "Post a Banner",
        description: "Create a marketing banner for the campaign",
        date: "July 25, 2025",
        time: "7:00 AM",
        platforms: &[Tiktok, Instagram, Facebook],
        author: "John Doe",
        likes: 0,
        notes: "This is a sample note",
    },
    SamplePost {
        grouping_id: "idea",
        id: "post-2",
        title: "Social Media Campaign",
        description: "Create engaging social media content",
        date: "June 26, 2025",
        time: "8:00 AM",
        platforms: &[Tiktok, Instagram],
        author: "Jane Smith",
        likes: 5,
        notes: "Focus on trending hashtags",
    },
    SamplePost {
        grouping_id: "idea",
        id: "post-3",
        title: "Product Launch Video",
        description: "Create promotional video for new product",
        date: "October 27, 2025",
        time: "9:00 AM",
        platforms: &[Facebook, Instagram],
        author: "Mike Johnson",
        likes: 12,
        notes: "Include product features",
    },
    SamplePost {
        grouping_id: "idea",
        id: "post-5",
        title: "Holiday Special Post",
        description: "Create festive content for holidays",
        date: "August 28, 2025",
        time: "10:00 AM",
        platforms: &[Tiktok, Facebook],
        author: "Sarah Wilson",
        likes: 8,
        notes: "Use holiday themes",
    },
    SamplePost {
        grouping_id: "idea",
        id: "post-6",
        title: "Behind the Scenes",
        description: "Show company culture and team",
        date: "October 29, 2023",
        time: "11:00 AM",
        platforms: &[Instagram, Facebook],
        author: "Tom Brown",
        likes: 15,
        notes: "Authentic content",
    },
    SamplePost {
        grouping_id: "idea",
        id: "post-7",
        title: "Customer Testimonial",
        description: "Feature satisfied customer reviews",
        date: "July 30, 2025",
        time: "12:00 PM",
        platforms: &[Tiktok, Instagram, Facebook],
        author: "Lisa Davis",
        likes: 20,
        notes: "Include customer quotes",
    },
    SamplePost {
        grouping_id: "idea",
        id: "post-8",
        title: "Tutorial Content",
        description: "Educational content about product usage",
        date: "October 31, 2025",
        time: "1:00 PM",
        platforms: &[Tiktok, Instagram],
        author: "Alex Chen",
        likes: 18,
        notes: "Step-by-step guide",
    },
    SamplePost {
        grouping_id: "idea",
        id: "post-9",
        title: "Weekly Roundup",
        description: "Summary of week's highlights",
        date: "November 1, 2025",
        time: "2:00 PM",
        platforms: &[Facebook, Instagram],
        author: "Emma Taylor",
        likes: 10,
        notes: "Include key metrics",
    },
    SamplePost {
        grouping_id: "progress",
        id: "post-4",
        title: "Post a Banner",
        description: "Create a marketing banner for the campaign",
        date: "July 25, 2025",
        time: "7:00 AM",
        platforms: &[Tiktok, Instagram, Facebook],
        author: "John Doe",
        likes: 0,
        notes: "This is a sample note",
    },
    SamplePost {
        grouping_id: "progress",
        id: "post-10",
        title: "Video Editing",
        description: "Edit promotional video content",
        date: "June 21, 2025",
        time: "3:00 PM",
        platforms: &[Tiktok, Instagram],
        author: "David Lee",
        likes: 7,
        notes: "Add transitions and effects",
    },
    SamplePost {
        grouping_id: "progress",
        id: "post-11",
        title: "Content Review",
        description: "Review and approve content drafts",
        date: "June 21, 2025",
        time: "4:00 PM",
        platforms: &[Facebook, Instagram],
        author: "Rachel Green",
        likes: 3,
        notes: "Check brand guidelines",
    },
    SamplePost {
        grouping_id: "progress",
        id: "post-12",
        title: "Graphics Design",
        description: "Create visual assets for posts",
        date: "June 20, 2025",
        time: "5:00 PM",
        platforms: &[Tiktok, Facebook],
        author: "Kevin Park",
        likes: 11,
        notes: "Use brand colors",
    },
];

/// Returns the seeded five-column board with its sample posts.
pub fn default_board() -> GroupingSet {
    let groupings = COLUMNS
        .iter()
        .map(|(id, title)| {
            let posts = SAMPLE_POSTS
                .iter()
                .filter(|sample| sample.grouping_id == *id)
                .map(SamplePost::to_post)
                .collect();
            Grouping::with_posts(*id, *title, posts)
        })
        .collect();
    GroupingSet::new(groupings)
}

impl SamplePost {
    fn to_post(&self) -> Post {
        Post {
            id: self.id.to_string(),
            title: self.title.to_string(),
            description: self.description.to_string(),
            date: self.date.to_string(),
            time: self.time.to_string(),
            platforms: self.platforms.to_vec(),
            image: SAMPLE_IMAGE.to_string(),
            author: self.author.to_string(),
            likes: self.likes,
            notes: self.notes.to_string(),
            auto_post: false,
        }
    }
}
