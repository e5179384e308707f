//! Curated expert catalog.
//!
//! Static tables used by the agent's database tool, the local demo
//! shortcut and the offline fallback selection. Table order matters:
//! lookups take the first key contained in the topic.

/// Region → category → experts
pub type RegionCatalog = &'static [(&'static str, &'static [(&'static str, &'static [&'static str])])];

pub const GLOBAL: &str = "Global";

/// Category used when no topic keyword matches
pub const DEFAULT_CATEGORY: &str = "Science & Technology";

pub const REGION_PERSONAS: RegionCatalog = &[
    (
        "India",
        &[
            ("Science & Technology", &["Jagadish Chandra Bose", "C.V. Raman", "Vikram Sarabhai", "Homi Bhabha"]),
            ("Mathematics", &["Srinivasa Ramanujan", "Aryabhata"]),
            ("Philosophy & Spirituality", &["Ramakrishna Paramahamsa", "Jiddu Krishnamurti", "Swami Vivekananda"]),
            ("Business & Entrepreneurship", &["Ratan Tata", "Mukesh Ambani", "Narayana Murthy"]),
            ("Medicine", &["Sushruta", "Charaka"]),
            ("Literature", &["Rabindranath Tagore", "Premchand"]),
            ("Politics", &["Mahatma Gandhi", "Jawaharlal Nehru", "Dr. Ambedkar"]),
            ("Sports", &["Sachin Tendulkar", "Virat Kohli"]),
            ("Arts", &["Raja Ravi Varma"]),
            ("Astronomy", &["Aryabhata", "Bhaskara II"]),
        ],
    ),
    (
        "United States",
        &[
            ("Science & Technology", &["Albert Einstein", "Isaac Newton", "Stephen Hawking", "Richard Feynman"]),
            ("Computer Science", &["Alan Turing", "Grace Hopper", "Steve Jobs", "Bill Gates"]),
            ("Physics", &["Richard Feynman", "J. Robert Oppenheimer", "Enrico Fermi"]),
            ("Business & Entrepreneurship", &["Warren Buffett", "Elon Musk", "Steve Jobs", "Jeff Bezos"]),
            ("Literature", &["Mark Twain", "Ernest Hemingway", "F. Scott Fitzgerald"]),
            ("Medicine", &["Jonas Salk", "Louis Pasteur"]),
            ("Psychology", &["Carl Rogers", "B.F. Skinner"]),
            ("Sports", &["Michael Jordan", "Muhammad Ali"]),
            ("Music", &["Duke Ellington", "Louis Armstrong"]),
        ],
    ),
    (
        "United Kingdom",
        &[
            ("Science & Technology", &["Isaac Newton", "Stephen Hawking", "Alan Turing"]),
            ("Literature", &["William Shakespeare", "Jane Austen", "Charles Dickens"]),
            ("Physics", &["Michael Faraday", "Paul Dirac"]),
            ("Medicine", &["Edward Jenner", "Florence Nightingale"]),
            ("Philosophy", &["David Hume", "Bertrand Russell"]),
            ("Economics", &["Adam Smith", "John Maynard Keynes"]),
            ("Biology", &["Charles Darwin", "Joseph Banks"]),
        ],
    ),
    (
        "Germany",
        &[
            ("Science & Technology", &["Albert Einstein", "Max Planck", "Werner Heisenberg"]),
            ("Philosophy", &["Immanuel Kant", "Georg Hegel", "Friedrich Nietzsche"]),
            ("Music", &["Johann Sebastian Bach", "Ludwig van Beethoven", "Richard Wagner"]),
            ("Physics", &["Max Born", "Erwin Schrödinger"]),
            ("Literature", &["Johann Wolfgang von Goethe", "Thomas Mann"]),
            ("Psychology", &["Sigmund Freud", "Carl Jung"]),
        ],
    ),
    (
        "France",
        &[
            ("Science & Technology", &["Pierre Curie", "Marie Curie", "Louis Pasteur"]),
            ("Philosophy", &["René Descartes", "Jean-Paul Sartre", "Michel Foucault"]),
            ("Literature", &["Victor Hugo", "Alexandre Dumas", "Marcel Proust"]),
            ("Mathematics", &["Henri Poincaré", "Évariste Galois"]),
            ("Art", &["Leonardo da Vinci", "Vincent van Gogh"]),
        ],
    ),
    (
        "Japan",
        &[
            ("Science & Technology", &["Yoshiro Nakamatsu", "Akira Yoshino"]),
            ("Philosophy", &["Masao Abe", "Kitaro Nishida"]),
            ("Literature", &["Haruki Murakami", "Yasunari Kawabata"]),
            ("Martial Arts", &["Gichin Funakoshi", "Jigoro Kano"]),
            ("Art & Design", &["Katsushika Hokusai"]),
        ],
    ),
    (
        "China",
        &[
            ("Science & Technology", &["Tu Youyou"]),
            ("Philosophy", &["Confucius", "Laozi", "Zhuangzi"]),
            ("Medicine", &["Hua Tuo", "Li Shizhen"]),
            ("Martial Arts", &["Bruce Lee"]),
            ("Literature", &["Luo Guanzhong"]),
            ("Art", &["Zhang Daqian"]),
        ],
    ),
    (
        GLOBAL,
        &[
            ("Science & Technology", &["Albert Einstein", "Isaac Newton", "Marie Curie"]),
            ("Philosophy", &["Plato", "Aristotle", "Socrates"]),
            ("Business", &["Peter Drucker", "Jack Welch"]),
            ("Psychology", &["Sigmund Freud", "Carl Jung", "Abraham Maslow"]),
            ("Economics", &["Adam Smith", "Thomas Piketty"]),
        ],
    ),
];

/// Topic keyword → category, checked in order
pub const TOPIC_CATEGORY_MAP: &[(&str, &str)] = &[
    ("python", "Computer Science"),
    ("programming", "Computer Science"),
    ("coding", "Computer Science"),
    ("web development", "Computer Science"),
    ("machine learning", "Computer Science"),
    ("ai", "Computer Science"),
    ("artificial intelligence", "Computer Science"),
    ("data science", "Computer Science"),
    ("physics", "Science & Technology"),
    ("quantum", "Science & Technology"),
    ("relativity", "Science & Technology"),
    ("astronomy", "Astronomy"),
    ("mathematics", "Mathematics"),
    ("business", "Business & Entrepreneurship"),
    ("entrepreneurship", "Business & Entrepreneurship"),
    ("startup", "Business & Entrepreneurship"),
    ("psychology", "Psychology"),
    ("mental health", "Psychology"),
    ("philosophy", "Philosophy"),
    ("literature", "Literature"),
    ("medicine", "Medicine"),
    ("health", "Medicine"),
    ("sports", "Sports"),
    ("music", "Music"),
    ("art", "Arts"),
];

/// Local shortcut answers, used for the Global region only
pub const DEMO_MAP: &[(&str, &[&str])] = &[
    ("helicopter shot", &["Mahendra Singh Dhoni", "Hardik Pandya", "Kieron Pollard"]),
    ("python", &["Guido van Rossum", "Linus Torvalds", "Peter Norvig"]),
    ("relativity", &["Albert Einstein", "Stephen Hawking", "Richard Feynman"]),
    ("evolution", &["Charles Darwin", "Richard Dawkins", "Stephen Jay Gould"]),
];

/// Globally famous names used to fill fallback slots
pub const FAMOUS_PERSONAS: &[&str] = &[
    "Elon Musk", "Jeff Bezos", "Steve Jobs", "Bill Gates", "Warren Buffett",
    "Albert Einstein", "Isaac Newton", "Marie Curie", "Stephen Hawking", "Nikola Tesla",
    "Naval Ravikant", "Sam Altman", "Mark Zuckerberg", "Sundar Pichai",
    "Chanakya", "A.P.J. Abdul Kalam", "Swami Vivekananda", "Satya Nadella",
    "Richard Feynman", "Carl Sagan", "Neil deGrasse Tyson",
];

/// Country → famous people from there
pub const COUNTRY_PERSONAS: &[(&str, &[&str])] = &[
    (GLOBAL, &["Albert Einstein", "Isaac Newton", "Leonardo da Vinci", "Marie Curie", "Nikola Tesla"]),
    ("India", &["A.P.J. Abdul Kalam", "Ratan Tata", "Sundar Pichai", "Satya Nadella", "Chanakya", "Swami Vivekananda", "Srinivasa Ramanujan", "C.V. Raman"]),
    ("United States", &["Elon Musk", "Steve Jobs", "Bill Gates", "Jeff Bezos", "Warren Buffett", "Benjamin Franklin", "Thomas Edison"]),
    ("United Kingdom", &["Stephen Hawking", "Alan Turing", "Isaac Newton", "Charles Darwin", "Tim Berners-Lee", "Winston Churchill"]),
    ("China", &["Jack Ma", "Confucius", "Lei Jun", "Robin Li", "Pony Ma"]),
    ("Japan", &["Akio Morita", "Masayoshi Son", "Hayao Miyazaki", "Satoshi Tajiri"]),
    ("Germany", &["Albert Einstein", "Werner Heisenberg", "Max Planck", "Karl Benz"]),
    ("France", &["Marie Curie", "Louis Pasteur", "Blaise Pascal", "René Descartes"]),
    ("Canada", &["Geoffrey Hinton", "Yoshua Bengio", "Marshall McLuhan"]),
    ("Australia", &["Steve Irwin", "Hugh Jackman", "Nicole Kidman"]),
    ("Brazil", &["Paulo Coelho", "Ayrton Senna", "Pelé"]),
    ("Russia", &["Dmitri Mendeleev", "Mikhail Lomonosov", "Sergey Brin"]),
    ("South Korea", &["Ban Ki-moon", "Lee Kun-hee"]),
    ("Italy", &["Leonardo da Vinci", "Galileo Galilei", "Enrico Fermi"]),
    ("Spain", &["Pablo Picasso", "Salvador Dalí", "Antoni Gaudí"]),
    ("Mexico", &["Frida Kahlo", "Octavio Paz", "Carlos Slim"]),
    ("Netherlands", &["Vincent van Gogh", "Christiaan Huygens"]),
    ("Switzerland", &["Albert Einstein", "Carl Jung", "Jean Piaget"]),
    ("Sweden", &["Alfred Nobel", "Ingvar Kamprad", "Greta Thunberg"]),
    ("South Africa", &["Nelson Mandela", "Elon Musk", "Desmond Tutu"]),
    ("Argentina", &["Jorge Luis Borges", "Lionel Messi"]),
    ("Poland", &["Marie Curie", "Nicolaus Copernicus"]),
    ("Turkey", &["Rumi", "Mustafa Kemal Atatürk"]),
    ("Indonesia", &["B.J. Habibie", "Soekarno"]),
    ("Saudi Arabia", &["Ibn Sina (Avicenna)", "Al-Khwarizmi"]),
    ("Egypt", &["Naguib Mahfouz", "Cleopatra"]),
    ("Israel", &["Albert Einstein", "Shimon Peres"]),
    ("Singapore", &["Lee Kuan Yew"]),
    ("Malaysia", &["Mahathir Mohamad"]),
    ("Thailand", &["Bhumibol Adulyadej"]),
    ("Philippines", &["José Rizal", "Manny Pacquiao"]),
    ("Vietnam", &["Ho Chi Minh"]),
    ("Pakistan", &["Malala Yousafzai", "Abdus Salam"]),
    ("Bangladesh", &["Muhammad Yunus", "Rabindranath Tagore"]),
    ("Nigeria", &["Chinua Achebe", "Wole Soyinka"]),
    ("Kenya", &["Wangari Maathai"]),
    ("Ghana", &["Kofi Annan"]),
    ("Ireland", &["James Joyce", "Oscar Wilde"]),
    ("New Zealand", &["Ernest Rutherford"]),
    ("Norway", &["Edvard Munch", "Roald Amundsen"]),
    ("Denmark", &["Niels Bohr", "Hans Christian Andersen"]),
    ("Finland", &["Linus Torvalds"]),
    ("Austria", &["Sigmund Freud", "Wolfgang Amadeus Mozart"]),
    ("Belgium", &["Georges Lemaître"]),
    ("Greece", &["Socrates", "Plato", "Aristotle"]),
    ("Portugal", &["Cristiano Ronaldo", "José Saramago"]),
    ("Czech Republic", &["Václav Havel"]),
    ("Chile", &["Pablo Neruda"]),
    ("Colombia", &["Gabriel García Márquez"]),
    ("Peru", &["Mario Vargas Llosa"]),
];

/// Topic keyword → experts, checked in order
pub const TOPIC_EXPERT_MAP: &[(&str, &[&str])] = &[
    ("python", &["Guido van Rossum", "Peter Norvig", "Wes McKinney"]),
    ("javascript", &["Brendan Eich", "Douglas Crockford", "Ryan Dahl"]),
    ("java", &["James Gosling", "Joshua Bloch", "Martin Fowler"]),
    ("ai", &["Geoffrey Hinton", "Yann LeCun", "Andrew Ng"]),
    ("machine learning", &["Andrew Ng", "Yoshua Bengio", "Fei-Fei Li"]),
    ("web development", &["Tim Berners-Lee", "Marc Andreessen", "Brendan Eich"]),
    ("mobile apps", &["Andy Rubin", "Steve Jobs", "Tim Cook"]),
    ("electricity", &["Thomas Edison", "Nikola Tesla", "Michael Faraday"]),
    ("bulb", &["Thomas Edison", "Nikola Tesla", "Joseph Swan"]),
    ("light", &["Thomas Edison", "Albert Einstein", "James Clerk Maxwell"]),
    ("physics", &["Albert Einstein", "Isaac Newton", "Richard Feynman"]),
    ("chemistry", &["Marie Curie", "Dmitri Mendeleev", "Linus Pauling"]),
    ("biology", &["Charles Darwin", "Gregor Mendel", "James Watson"]),
    ("space", &["Neil deGrasse Tyson", "Carl Sagan", "Stephen Hawking"]),
    ("startup", &["Paul Graham", "Sam Altman", "Eric Ries"]),
    ("business", &["Peter Drucker", "Warren Buffett", "Jack Welch"]),
    ("marketing", &["Seth Godin", "Philip Kotler", "Gary Vaynerchuk"]),
    ("investment", &["Warren Buffett", "Charlie Munger", "Benjamin Graham"]),
    ("mathematics", &["Albert Einstein", "Isaac Newton", "Srinivasa Ramanujan"]),
    ("calculus", &["Isaac Newton", "Gottfried Leibniz", "Leonhard Euler"]),
    ("statistics", &["Ronald Fisher", "Karl Pearson", "Florence Nightingale"]),
    ("philosophy", &["Socrates", "Plato", "Aristotle"]),
    ("psychology", &["Sigmund Freud", "Carl Jung", "B.F. Skinner"]),
    ("mindfulness", &["Dalai Lama", "Thich Nhat Hanh", "Eckhart Tolle"]),
    ("mental health", &["Sigmund Freud", "Carl Jung", "Viktor Frankl"]),
    ("therapy", &["Carl Rogers", "Aaron Beck", "Albert Ellis"]),
    ("depression", &["Aaron Beck", "Martin Seligman", "Kay Redfield Jamison"]),
    ("anxiety", &["David Burns", "Claire Weekes", "Edmund Bourne"]),
    ("meditation", &["Dalai Lama", "Jon Kabat-Zinn", "Thich Nhat Hanh"]),
    ("wellness", &["Deepak Chopra", "Andrew Weil", "Brené Brown"]),
    ("self-help", &["Tony Robbins", "Dale Carnegie", "Stephen Covey"]),
];

/// Keyword groups → experts, used when no topic key matches
pub const KEYWORD_EXPERT_MAP: &[(&[&str], &[&str])] = &[
    (&["mental", "health", "therapy", "counseling", "psychiatric"], &["Sigmund Freud", "Carl Jung", "Viktor Frankl"]),
    (&["depression", "anxiety", "stress", "trauma"], &["Aaron Beck", "Martin Seligman", "Bessel van der Kolk"]),
    (&["meditation", "mindfulness", "zen", "spiritual"], &["Dalai Lama", "Jon Kabat-Zinn", "Thich Nhat Hanh"]),
    (&["programming", "coding", "software", "developer"], &["Linus Torvalds", "Guido van Rossum", "Dennis Ritchie"]),
    (&["ai", "artificial", "intelligence", "machine", "learning"], &["Geoffrey Hinton", "Yann LeCun", "Andrew Ng"]),
    (&["physics", "quantum", "relativity", "universe"], &["Albert Einstein", "Richard Feynman", "Stephen Hawking"]),
    (&["biology", "evolution", "genetics", "dna"], &["Charles Darwin", "James Watson", "Francis Crick"]),
    (&["chemistry", "chemical", "molecule", "atom"], &["Marie Curie", "Linus Pauling", "Dmitri Mendeleev"]),
    (&["business", "entrepreneur", "startup", "company"], &["Peter Drucker", "Steve Jobs", "Warren Buffett"]),
    (&["marketing", "sales", "advertising", "brand"], &["Seth Godin", "Philip Kotler", "Gary Vaynerchuk"]),
    (&["leadership", "management", "team", "organization"], &["Simon Sinek", "Peter Drucker", "Jim Collins"]),
];

/// Category for a topic: the first contained keyword wins
pub fn category_for_topic(topic: &str) -> &'static str {
    let lowered = topic.to_lowercase();
    TOPIC_CATEGORY_MAP
        .iter()
        .find(|(key, _)| lowered.contains(*key))
        .map(|(_, category)| *category)
        .unwrap_or(DEFAULT_CATEGORY)
}

/// Categories of one region in the curated catalog
pub fn region_categories(region: &str) -> &'static [(&'static str, &'static [&'static str])] {
    REGION_PERSONAS
        .iter()
        .find(|(name, _)| *name == region)
        .map(|(_, categories)| *categories)
        .unwrap_or(&[])
}

pub fn region_experts(region: &str, category: &str) -> &'static [&'static str] {
    region_categories(region)
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, experts)| *experts)
        .unwrap_or(&[])
}

pub fn demo_experts(topic: &str) -> Option<&'static [&'static str]> {
    let lowered = topic.to_lowercase();
    DEMO_MAP
        .iter()
        .find(|(key, _)| lowered.contains(*key))
        .map(|(_, experts)| *experts)
}

pub fn country_personas(country: &str) -> &'static [&'static str] {
    COUNTRY_PERSONAS
        .iter()
        .find(|(name, _)| *name == country)
        .map(|(_, personas)| *personas)
        .unwrap_or(&[])
}

/// Region choices: Global first, the rest alphabetically
pub fn country_list() -> Vec<&'static str> {
    let mut countries: Vec<&'static str> = COUNTRY_PERSONAS
        .iter()
        .map(|(name, _)| *name)
        .filter(|name| *name != GLOBAL)
        .collect();
    countries.sort_unstable();
    std::iter::once(GLOBAL).chain(countries).collect()
}
